use std::cmp::Ordering;

use tracing::{instrument, trace};

use crate::error::{Error, Result};
use crate::storage::{ChainTable, RankedAvl, SparseArray};

/// Initial slot capacity of a course; the array doubles when it fills.
const CLASS_SLOTS: usize = 10;

/// A single class's record: accumulated watch time plus the owning course
/// and the class ordinal within it.
///
/// The ordering sorts by watch time first and *inverts* the two id
/// components, so that walking the ranking from its top yields watch-time
/// ties in ascending course order, and in ascending ordinal order within a
/// course.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ClassRecord {
    pub views: i32,
    pub course: i32,
    pub ordinal: i32,
}

impl Ord for ClassRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.views
            .cmp(&other.views)
            .then_with(|| other.course.cmp(&self.course))
            .then_with(|| other.ordinal.cmp(&self.ordinal))
    }
}

impl PartialOrd for ClassRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-course class storage: a sparse slot array indexed by class ordinal,
/// plus the next ordinal to hand out.
pub(crate) struct ClassTable {
    slots: SparseArray<ClassRecord>,
    top: i32,
}

impl ClassTable {
    fn new() -> Result<Self> {
        Ok(Self {
            slots: SparseArray::with_growth(CLASS_SLOTS, ClassRecord::default(), 2)?,
            top: 0,
        })
    }
}

/// In-memory catalog of courses and their classes, answering point lookups
/// of a class's accumulated watch time and rank queries over all watched
/// classes.
///
/// A watched class lives in two indices at once: its course's slot array
/// and the global watch-time ranking. Every mutation keeps the two
/// coherent: watching a class replaces its stale ranking key, and removing
/// a course withdraws all of its classes from the ranking first. Classes
/// that have never been watched stay out of the ranking altogether.
pub struct Catalog {
    courses: ChainTable<ClassTable>,
    ranking: RankedAvl<ClassRecord>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Result<Self> {
        Ok(Self {
            courses: ChainTable::new()?,
            ranking: RankedAvl::new(),
        })
    }

    /// Register a new course under the given id.
    pub fn add_course(&mut self, course: i32) -> Result<()> {
        if course <= 0 {
            return Err(Error::InvalidInput);
        }
        if self.courses.contains(course) {
            return Err(Error::CourseExists(course));
        }

        self.courses.insert(course, ClassTable::new()?)
    }

    /// Remove a course and every one of its classes from both indices.
    #[instrument(skip(self))]
    pub fn remove_course(&mut self, course: i32) -> Result<()> {
        if course <= 0 {
            return Err(Error::InvalidInput);
        }
        let table = self
            .courses
            .get(course)
            .map_err(|_| Error::CourseNotFound(course))?;

        trace!(classes = table.top, "removing a course");

        for ordinal in 0..table.top {
            let record = *table.slots.get(ordinal as usize)?;
            self.ranking.remove(&record);
        }
        self.courses.remove(course);
        Ok(())
    }

    /// Add a class to a course, handing out the next dense ordinal.
    ///
    /// A fresh class starts with zero accumulated time and stays out of the
    /// ranking until it is first watched.
    pub fn add_class(&mut self, course: i32) -> Result<i32> {
        if course <= 0 {
            return Err(Error::InvalidInput);
        }
        let table = self
            .courses
            .get_mut(course)
            .map_err(|_| Error::CourseNotFound(course))?;

        let ordinal = table.top;
        table.slots.store(
            ordinal as usize,
            ClassRecord {
                views: 0,
                course,
                ordinal,
            },
        )?;
        table.top += 1;
        Ok(ordinal)
    }

    /// Accumulate watch time on a class.
    ///
    /// The class's ranking key embeds its watch time, so the stale key has
    /// to be replaced: the bumped key is inserted first and the stale one
    /// removed second, putting the only allocation of the pair before
    /// anything is taken out. The two keys always differ because watch time
    /// strictly grows, and a never-watched class has no stale key to
    /// remove.
    #[instrument(skip(self))]
    pub fn watch_class(&mut self, course: i32, class: i32, time: i32) -> Result<()> {
        if time <= 0 || class < 0 || course <= 0 {
            return Err(Error::InvalidInput);
        }
        let table = self
            .courses
            .get_mut(course)
            .map_err(|_| Error::CourseNotFound(course))?;
        if class as usize >= table.slots.initialized() {
            return Err(Error::InvalidInput);
        }

        let stale = *table.slots.get(class as usize)?;
        let bumped = ClassRecord {
            views: stale.views + time,
            ..stale
        };
        table.slots.store(class as usize, bumped)?;

        self.ranking.insert(bumped, ());
        self.ranking.remove(&stale);
        Ok(())
    }

    /// Report a class's accumulated watch time.
    pub fn time_viewed(&self, course: i32, class: i32) -> Result<i32> {
        if course <= 0 || class < 0 {
            return Err(Error::InvalidInput);
        }
        let table = self
            .courses
            .get(course)
            .map_err(|_| Error::CourseNotFound(course))?;
        if class as usize >= table.slots.initialized() {
            return Err(Error::InvalidInput);
        }

        Ok(table.slots.get(class as usize)?.views)
    }

    /// Report the course and ordinal of the `i`-th most watched class.
    ///
    /// Watch-time ties go to the smaller course id, then to the smaller
    /// ordinal within the course.
    pub fn ith_watched_class(&self, i: i32) -> Result<(i32, i32)> {
        if i <= 0 {
            return Err(Error::InvalidInput);
        }
        let i = i as usize;
        if i > self.ranking.len() {
            return Err(Error::RankOutOfRange(i));
        }

        let record = self
            .ranking
            .select_from_top(i)
            .ok_or(Error::RankOutOfRange(i))?;
        Ok((record.course, record.ordinal))
    }

    /// The `count` most watched classes as `(course, ordinal)` pairs, from
    /// the top of the ranking down; shorter when fewer classes have been
    /// watched.
    pub fn most_watched(&self, count: usize) -> Vec<(i32, i32)> {
        self.ranking
            .iter_descending()
            .take(count)
            .map(|(record, _)| (record.course, record.ordinal))
            .collect()
    }

    /// Number of classes currently in the ranking, that is, watched at
    /// least once.
    pub fn watched_classes(&self) -> usize {
        self.ranking.len()
    }
}
