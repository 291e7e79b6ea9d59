use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::transaction::Transaction;

/// Which side of a Merkle proof step a sibling hash sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Left,
    Right,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProofStep {
    pub hash: String,
    pub position: Position,
}

/// A balanced binary Merkle tree over transaction hashes (SHA-256 leaves).
/// Odd levels duplicate the last element; an empty transaction list yields
/// the all-zero root.
pub struct MerkleTree {
    levels: Vec<Vec<[u8; 32]>>,
}

fn tx_leaf_hash(tx: &Transaction) -> [u8; 32] {
    Sha256::digest(tx.tx_id.as_str().as_bytes()).into()
}

fn parent_hash(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

impl MerkleTree {
    pub fn build(transactions: &[Transaction]) -> Self {
        if transactions.is_empty() {
            return Self {
                levels: vec![vec![[0u8; 32]]],
            };
        }

        let mut current: Vec<[u8; 32]> = transactions.iter().map(tx_leaf_hash).collect();
        let mut levels = vec![current.clone()];

        while current.len() > 1 {
            if current.len() % 2 == 1 {
                current.push(*current.last().unwrap());
            }
            let next: Vec<[u8; 32]> = current
                .chunks(2)
                .map(|pair| parent_hash(&pair[0], &pair[1]))
                .collect();
            levels.push(next.clone());
            current = next;
        }

        Self { levels }
    }

    pub fn root(&self) -> [u8; 32] {
        *self.levels.last().unwrap().last().unwrap()
    }

    pub fn root_hex(&self) -> String {
        hex::encode(self.root())
    }

    /// Walk sibling hashes from leaf `index` up to the root, recording each
    /// sibling's hash and which side it sits on.
    pub fn proof_of_inclusion(&self, mut index: usize) -> Option<Vec<ProofStep>> {
        if self.levels[0].len() == 1 && self.levels[0][0] == [0u8; 32] {
            return None; // empty tree has no leaves to prove
        }
        if index >= self.levels[0].len() {
            return None;
        }

        let mut proof = Vec::new();
        for level in &self.levels[..self.levels.len() - 1] {
            let mut level = level.clone();
            if level.len() % 2 == 1 {
                level.push(*level.last().unwrap());
            }
            let sibling_index = if index % 2 == 0 { index + 1 } else { index - 1 };
            let position = if index % 2 == 0 {
                Position::Right
            } else {
                Position::Left
            };
            proof.push(ProofStep {
                hash: hex::encode(level[sibling_index]),
                position,
            });
            index /= 2;
        }
        Some(proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TxType;
    use archivechain_core::types::Address;
    use archivechain_safemath::Amount;

    fn tx(n: u8) -> Transaction {
        let mut t = Transaction::new_unsigned(
            TxType::Transfer,
            None,
            Address::new(format!("arc{n:040}")),
            None,
            Amount::from_arc(1),
            Amount::ZERO,
            1_700_000_000,
        );
        t.tx_id = archivechain_core::types::TxId::from_hex(format!("{n:064x}"));
        t
    }

    #[test]
    fn empty_tree_has_zero_root() {
        let tree = MerkleTree::build(&[]);
        assert_eq!(tree.root(), [0u8; 32]);
    }

    #[test]
    fn odd_leaf_count_duplicates_last() {
        let txs = vec![tx(1), tx(2), tx(3)];
        let tree = MerkleTree::build(&txs);
        assert!(!tree.root_hex().is_empty());
        assert!(tree.proof_of_inclusion(2).is_some());
    }

    #[test]
    fn proof_is_none_out_of_range() {
        let txs = vec![tx(1), tx(2)];
        let tree = MerkleTree::build(&txs);
        assert!(tree.proof_of_inclusion(5).is_none());
    }
}
