use std::{cmp, mem};

use tracing::{trace, warn};

use super::avl::Avl;
use super::sparse::SparseArray;
use crate::error::{Error, Result};

/// Initial bucket count.
const INIT_BUCKETS: usize = 10;

/// Load factor ceiling; a counted mutation that pushes the load to this
/// value triggers a rebuild.
const STRESS: f64 = 2.0;

/// Multiplicative hash parameter, `(√5 − 1) / 2`.
const RATIO: f64 = 0.618_033_988_749_894_8;

/// Hash table from `i32` keys to values, chained through balanced trees.
///
/// Buckets live in a [`SparseArray`] and each bucket is an [`Avl`] tree, so
/// even a degenerate bucket resolves in logarithmic time. The bucket count
/// tracks the load factor: the table is rebuilt once the load reaches
/// [`STRESS`] and rebuilt back down once it falls under a quarter of that,
/// both times aiming at half the ceiling. Shrinking additionally requires
/// that the table has grown before and still exceeds its initial size;
/// dropping either guard makes the size oscillate around [`INIT_BUCKETS`].
pub(crate) struct ChainTable<V> {
    table: SparseArray<Avl<i32, V>>,
    len: usize,
    expanded: bool,
}

impl<V> ChainTable<V> {
    pub fn new() -> Result<Self> {
        Ok(Self {
            table: SparseArray::new(INIT_BUCKETS, Avl::new())?,
            len: 0,
            expanded: false,
        })
    }

    /// Number of key-value pairs in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Map a key to its bucket under the current bucket count.
    fn bucket_index(&self, key: i32) -> usize {
        let cells = self.table.capacity() as f64;
        (cells * (key as f64 * RATIO).rem_euclid(1.0)) as usize
    }

    /// Insert the pair into the table.
    ///
    /// A key that is already present has its value replaced in place; only
    /// genuinely new keys count towards the load.
    pub fn insert(&mut self, key: i32, value: V) -> Result<()> {
        let index = self.bucket_index(key);
        if !self.table.is_initialized(index) {
            self.table.store(index, Avl::new())?;
        }

        let bucket = self
            .table
            .get_mut(index)
            .ok_or(Error::OutOfBounds(index))?;
        if bucket.insert(key, value) {
            self.len += 1;
            self.fix_stress();
        }
        Ok(())
    }

    /// Remove the key and its value from the table.
    pub fn remove(&mut self, key: i32) {
        let index = self.bucket_index(key);
        let removed = match self.table.get_mut(index) {
            Some(bucket) => bucket.remove(&key),
            None => false,
        };

        if removed {
            self.len -= 1;
            self.fix_stress();
        }
    }

    /// Get the value associated with the given key.
    pub fn get(&self, key: i32) -> Result<&V> {
        self.table
            .get(self.bucket_index(key))?
            .get(&key)
            .ok_or(Error::KeyNotFound(key))
    }

    pub fn get_mut(&mut self, key: i32) -> Result<&mut V> {
        let index = self.bucket_index(key);
        self.table
            .get_mut(index)
            .and_then(|bucket| bucket.get_mut(&key))
            .ok_or(Error::KeyNotFound(key))
    }

    pub fn contains(&self, key: i32) -> bool {
        match self.table.get(self.bucket_index(key)) {
            Ok(bucket) => bucket.contains(&key),
            Err(_) => false,
        }
    }

    /// Rebuild the bucket array whenever the load factor leaves its band.
    ///
    /// A failed rebuild is swallowed: the table keeps working at its current
    /// size and the next counted mutation retries.
    fn fix_stress(&mut self) {
        let cells = self.table.capacity();
        let load = self.len as f64 / cells as f64;

        let stressed = load >= STRESS;
        let wasteful = cells > INIT_BUCKETS && self.expanded && load < STRESS / 4.0;
        if !stressed && !wasteful {
            return;
        }

        let target = cmp::max(self.len, INIT_BUCKETS);
        if let Err(e) = self.remake(target) {
            warn!(error = %e, cells, len = self.len, "bucket rebuild failed");
        }
    }

    /// Move every entry into a freshly allocated bucket array of `cells`
    /// buckets, rehashing under the new count.
    ///
    /// Nothing is touched until the new array is allocated, so an
    /// allocation failure leaves the table structurally unchanged.
    fn remake(&mut self, cells: usize) -> Result<()> {
        let next = SparseArray::new(cells, Avl::new())?;
        let old = mem::replace(&mut self.table, next);

        trace!(from = old.capacity(), to = cells, len = self.len, "rebuilding bucket table");

        for bucket in old.into_values() {
            for (key, value) in bucket {
                let index = self.bucket_index(key);
                if !self.table.is_initialized(index) {
                    self.table.store(index, Avl::new())?;
                }
                if let Some(bucket) = self.table.get_mut(index) {
                    bucket.insert(key, value);
                }
            }
        }

        self.expanded = true;
        Ok(())
    }
}

#[cfg(test)]
impl<V> ChainTable<V> {
    /// Current bucket count.
    fn cells(&self) -> usize {
        self.table.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChainTable, INIT_BUCKETS, STRESS};
    use crate::error::Error;

    #[test]
    fn inserted_pairs_are_gettable() {
        let mut table = ChainTable::new().unwrap();

        table.insert(3, "three").unwrap();
        table.insert(7, "seven").unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.contains(3));
        assert_eq!(table.get(3).unwrap(), &"three");
        assert_eq!(table.get(7).unwrap(), &"seven");
    }

    #[test]
    fn inserting_an_existing_key_overwrites_without_counting() {
        let mut table = ChainTable::new().unwrap();

        table.insert(3, 30).unwrap();
        table.insert(3, 31).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(3).unwrap(), &31);
    }

    #[test]
    fn missing_keys_are_reported() {
        let mut table = ChainTable::<i32>::new().unwrap();
        table.insert(1, 1).unwrap();

        assert!(!table.contains(2));
        assert!(matches!(table.get(2), Err(Error::KeyNotFound(2))));
        assert!(matches!(table.get_mut(2), Err(Error::KeyNotFound(2))));
    }

    #[test]
    fn removal_forgets_the_key() {
        let mut table = ChainTable::new().unwrap();

        table.insert(5, 50).unwrap();
        table.remove(5);
        table.remove(6);

        assert_eq!(table.len(), 0);
        assert!(!table.contains(5));
    }

    #[test]
    fn load_stays_under_stress_while_growing() {
        let mut table = ChainTable::new().unwrap();

        for key in 1..=100 {
            table.insert(key, key).unwrap();
            let load = table.len() as f64 / table.cells() as f64;
            assert!(load < STRESS);
        }

        assert_eq!(table.len(), 100);
        for key in 1..=100 {
            assert_eq!(table.get(key).unwrap(), &key);
        }
    }

    #[test]
    fn emptying_a_grown_table_shrinks_it_back() {
        let mut table = ChainTable::new().unwrap();

        for key in 1..=100 {
            table.insert(key, key).unwrap();
        }
        assert!(table.cells() > INIT_BUCKETS);

        for key in 1..=100 {
            table.remove(key);
            let cells = table.cells();
            if cells > INIT_BUCKETS {
                let load = table.len() as f64 / cells as f64;
                assert!(load >= STRESS / 4.0);
            }
        }

        assert_eq!(table.cells(), INIT_BUCKETS);
    }

    #[test]
    fn never_shrinks_before_the_first_growth() {
        let mut table = ChainTable::new().unwrap();

        for key in 1..=5 {
            table.insert(key, key).unwrap();
        }
        for key in 1..=5 {
            table.remove(key);
        }

        assert_eq!(table.cells(), INIT_BUCKETS);
    }

    #[test]
    fn rebuilds_preserve_every_entry() {
        let mut table = ChainTable::new().unwrap();

        for key in 1..=40 {
            table.insert(key, key * 2).unwrap();
        }
        for key in 1..=30 {
            table.remove(key);
        }

        assert_eq!(table.len(), 10);
        for key in 31..=40 {
            assert_eq!(table.get(key).unwrap(), &(key * 2));
        }
    }
}
