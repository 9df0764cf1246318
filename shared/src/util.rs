/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

const ID_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 7;

/// Generate an order id: `{unix_millis}-{7 random base36 chars}`.
///
/// Uniqueness comes from the millisecond prefix plus 36^7 suffixes per
/// millisecond; the id is not meant to be unguessable.
pub fn order_id() -> String {
    timestamped_id(ID_SUFFIX_LEN)
}

/// `{unix_millis}-{len random base36 chars}`
pub fn timestamped_id(len: usize) -> String {
    format!("{}-{}", now_millis(), random_base36(len))
}

fn random_base36(len: usize) -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ID_SUFFIX_ALPHABET[rng.gen_range(0..ID_SUFFIX_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_order_id_shape() {
        let id = order_id();
        let (millis, suffix) = id.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), ID_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_order_ids_are_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| order_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
