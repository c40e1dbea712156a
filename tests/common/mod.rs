#![allow(dead_code)]

/// Parameter names of the MPE emulator synth, in parameter id order.
pub const REGISTRY: [&str; 90] = [
    "MCM", "Z1TYP", "Z1CHN", "Z1ENH", "Z1ANC", "Z1ORV",
    "Z1R1IN", "Z1R1OU", "Z1R1IV", "Z1R1TR", "Z1R1DT", "Z1R1DL",
    "Z1R1MP", "Z1R1RS", "Z1R1NV", "Z1R2IN", "Z1R2OU", "Z1R2IV",
    "Z1R2TR", "Z1R2DT", "Z1R2DL", "Z1R2MP", "Z1R2RS", "Z1R2NV",
    "Z1R3IN", "Z1R3OU", "Z1R3IV", "Z1R3TR", "Z1R3DT", "Z1R3DL",
    "Z1R3MP", "Z1R3RS", "Z1R3NV", "Z1R4IN", "Z1R4OU", "Z1R4IV",
    "Z1R4TR", "Z1R4DT", "Z1R4DL", "Z1R4MP", "Z1R4RS", "Z1R4NV",
    "Z1R5IN", "Z1R5OU", "Z1R5IV", "Z1R5TR", "Z1R5DT", "Z1R5DL",
    "Z1R5MP", "Z1R5RS", "Z1R5NV", "Z1R6IN", "Z1R6OU", "Z1R6IV",
    "Z1R6TR", "Z1R6DT", "Z1R6DL", "Z1R6MP", "Z1R6RS", "Z1R6NV",
    "Z1R7IN", "Z1R7OU", "Z1R7IV", "Z1R7TR", "Z1R7DT", "Z1R7DL",
    "Z1R7MP", "Z1R7RS", "Z1R7NV", "Z1R8IN", "Z1R8OU", "Z1R8IV",
    "Z1R8TR", "Z1R8DT", "Z1R8DL", "Z1R8MP", "Z1R8RS", "Z1R8NV",
    "Z1R9IN", "Z1R9OU", "Z1R9IV", "Z1R9TR", "Z1R9DT", "Z1R9DL",
    "Z1R9MP", "Z1R9RS", "Z1R9NV", "Z1TRA", "Z1TRB", "Z1SUS",
];

/// `(name, parameter id)` pairs as the registry hands them over.
pub fn registry_entries() -> Vec<(&'static str, usize)> {
    REGISTRY.iter().enumerate().map(|(id, &name)| (name, id)).collect()
}
