//! Chunked blake3 root over an image payload.

use blake3::{Hash, Hasher};

/// Leaf granularity used for image payloads.
pub const CHUNK_SIZE: usize = 4096;

fn leaf(bytes: &[u8]) -> Hash {
    blake3::hash(bytes)
}

fn parent(left: &Hash, right: &Hash) -> Hash {
    let mut h = Hasher::new();
    h.update(left.as_bytes());
    h.update(right.as_bytes());
    h.finalize()
}

/// Binary hash tree over `chunk_size` leaves of `data`.
///
/// Subtrees are merged as soon as two of equal height exist; leftovers are
/// folded right to left. An empty payload hashes as one empty leaf.
pub fn chunked_root(data: &[u8], chunk_size: usize) -> Hash {
    let chunk_size = chunk_size.max(1);
    let mut stack: Vec<(u32, Hash)> = Vec::new();

    for chunk in data.chunks(chunk_size) {
        let mut node = (0, leaf(chunk));
        while let Some(&(height, left)) = stack.last() {
            if height != node.0 {
                break;
            }
            node = (height + 1, parent(&left, &node.1));
            stack.pop();
        }
        stack.push(node);
    }

    stack
        .into_iter()
        .rev()
        .map(|(_, hash)| hash)
        .reduce(|right, left| parent(&left, &right))
        .unwrap_or_else(|| leaf(&[]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_empty_leaf() {
        assert_eq!(chunked_root(&[], 8), blake3::hash(&[]));
    }

    #[test]
    fn single_chunk_is_plain_hash() {
        let data = [7u8; 5];
        assert_eq!(chunked_root(&data, 8), blake3::hash(&data));
    }

    #[test]
    fn two_chunks_combine() {
        let data: Vec<u8> = (0..16).collect();
        let expected = parent(&blake3::hash(&data[..8]), &blake3::hash(&data[8..]));
        assert_eq!(chunked_root(&data, 8), expected);
    }

    #[test]
    fn any_change_moves_the_root() {
        let mut data = vec![0u8; 3 * CHUNK_SIZE + 17];
        let before = chunked_root(&data, CHUNK_SIZE);
        data[2 * CHUNK_SIZE + 3] = 1;
        assert_ne!(before, chunked_root(&data, CHUNK_SIZE));
    }
}
