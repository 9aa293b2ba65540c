/// FNV-1a, 32-bit. Every block commits to its predecessor through this
/// digest, so the function (and the byte order of its input) is part of the
/// chain's observable contract.
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    let mut hash = OFFSET_BASIS;
    for &byte in bytes {
        hash = (hash ^ byte as u32).wrapping_mul(PRIME);
    }
    hash
}
