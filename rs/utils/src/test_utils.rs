use rand::Rng;

use crate::max_element_value;

// Generate a random vector with a given dimension, every element fitting in `bits` bits
pub fn generate_random_vector(dimension: usize, bits: u32) -> Vec<u32> {
    let mut rng = rand::thread_rng();
    let max = max_element_value(bits);
    let mut vector = vec![];
    for _ in 0..dimension {
        vector.push(rng.gen_range(0..=max));
    }
    vector
}
