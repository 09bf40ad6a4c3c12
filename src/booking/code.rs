//! Confirmation Code Generation
//!
//! 8 位大写字母数字。冲突概率 ~1/36^8，唯一性仍由
//! 存储层唯一索引兜底，冲突时调用方换码重试。

use rand::Rng;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 8;

/// Generate a random confirmation code
pub fn generate_confirmation_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_shape() {
        let code = generate_confirmation_code();
        assert_eq!(code.len(), 8);
        assert!(code.bytes().all(|b| CHARSET.contains(&b)));
    }

    #[test]
    fn test_codes_vary() {
        let a = generate_confirmation_code();
        let b = generate_confirmation_code();
        let c = generate_confirmation_code();
        // 3 连击碰撞的概率可以忽略
        assert!(!(a == b && b == c));
    }
}
