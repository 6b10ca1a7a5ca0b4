//! A single grid unit and the rules that keep its stitches consistent.
//!
//! A cell has fifteen stitch slots: one full stitch, two half stitches,
//! four petite stitches and eight quarter stitches (one per corner and
//! diagonal). Geometrically overlapping slots exclude each other; the
//! exclusion table lives in [`Slot::affected`] and is applied by every
//! insertion, including [`Cell::merge`].

use serde::{Deserialize, Serialize};

use crate::colors::Color;
use crate::grid::GridPos;

pub const SLOT_COUNT: usize = 15;

/// Diagonal direction of a half or quarter stitch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Slash,
    Backslash,
}

/// Corner of a cell occupied by a petite or quarter stitch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subarea {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Stitch slot. The discriminant is the on-disk slot index.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Slot {
    Full = 0,
    HalfSlash = 1,
    HalfBackslash = 2,
    PetiteTopLeft = 3,
    PetiteTopRight = 4,
    PetiteBottomLeft = 5,
    PetiteBottomRight = 6,
    QuarterTopLeftSlash = 7,
    QuarterTopLeftBackslash = 8,
    QuarterTopRightSlash = 9,
    QuarterTopRightBackslash = 10,
    QuarterBottomLeftSlash = 11,
    QuarterBottomLeftBackslash = 12,
    QuarterBottomRightSlash = 13,
    QuarterBottomRightBackslash = 14,
}

impl Slot {
    pub const ALL: [Slot; SLOT_COUNT] = [
        Slot::Full,
        Slot::HalfSlash,
        Slot::HalfBackslash,
        Slot::PetiteTopLeft,
        Slot::PetiteTopRight,
        Slot::PetiteBottomLeft,
        Slot::PetiteBottomRight,
        Slot::QuarterTopLeftSlash,
        Slot::QuarterTopLeftBackslash,
        Slot::QuarterTopRightSlash,
        Slot::QuarterTopRightBackslash,
        Slot::QuarterBottomLeftSlash,
        Slot::QuarterBottomLeftBackslash,
        Slot::QuarterBottomRightSlash,
        Slot::QuarterBottomRightBackslash,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Slot> {
        Slot::ALL.get(index).copied()
    }

    pub fn half(orientation: Orientation) -> Slot {
        match orientation {
            Orientation::Slash => Slot::HalfSlash,
            Orientation::Backslash => Slot::HalfBackslash,
        }
    }

    pub fn petite(subarea: Subarea) -> Slot {
        match subarea {
            Subarea::TopLeft => Slot::PetiteTopLeft,
            Subarea::TopRight => Slot::PetiteTopRight,
            Subarea::BottomLeft => Slot::PetiteBottomLeft,
            Subarea::BottomRight => Slot::PetiteBottomRight,
        }
    }

    pub fn quarter(orientation: Orientation, subarea: Subarea) -> Slot {
        use Orientation::{Backslash, Slash};
        match (subarea, orientation) {
            (Subarea::TopLeft, Slash) => Slot::QuarterTopLeftSlash,
            (Subarea::TopLeft, Backslash) => Slot::QuarterTopLeftBackslash,
            (Subarea::TopRight, Slash) => Slot::QuarterTopRightSlash,
            (Subarea::TopRight, Backslash) => Slot::QuarterTopRightBackslash,
            (Subarea::BottomLeft, Slash) => Slot::QuarterBottomLeftSlash,
            (Subarea::BottomLeft, Backslash) => Slot::QuarterBottomLeftBackslash,
            (Subarea::BottomRight, Slash) => Slot::QuarterBottomRightSlash,
            (Subarea::BottomRight, Backslash) => Slot::QuarterBottomRightBackslash,
        }
    }

    /// Slots cleared when this slot is added. Always includes the slot
    /// itself and [`Slot::Full`].
    pub fn affected(self) -> SlotSet {
        AFFECTED[self.index()]
    }

    /// Thread coverage relative to a full stitch.
    pub fn weight(self) -> f32 {
        match self {
            Slot::Full => 1.0,
            Slot::HalfSlash | Slot::HalfBackslash => 0.5,
            Slot::PetiteTopLeft
            | Slot::PetiteTopRight
            | Slot::PetiteBottomLeft
            | Slot::PetiteBottomRight => 0.5,
            _ => 0.25,
        }
    }
}

/// Fixed-size set of [`Slot`]s.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct SlotSet(u16);

impl SlotSet {
    pub const EMPTY: SlotSet = SlotSet(0);
    pub const ALL: SlotSet = SlotSet((1 << SLOT_COUNT) - 1);

    pub const fn of(slots: &[Slot]) -> SlotSet {
        let mut set = SlotSet::EMPTY;
        let mut i = 0;
        while i < slots.len() {
            set = set.with(slots[i]);
            i += 1;
        }
        set
    }

    pub const fn with(self, slot: Slot) -> SlotSet {
        SlotSet(self.0 | 1 << slot as u16)
    }

    pub const fn contains(self, slot: Slot) -> bool {
        self.0 & (1 << slot as u16) != 0
    }

    pub fn insert(&mut self, slot: Slot) {
        *self = self.with(slot);
    }

    pub fn remove(&mut self, slot: Slot) {
        self.0 &= !(1 << slot as u16);
    }

    pub const fn union(self, other: SlotSet) -> SlotSet {
        SlotSet(self.0 | other.0)
    }

    pub const fn intersection(self, other: SlotSet) -> SlotSet {
        SlotSet(self.0 & other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Raw bit pattern; bit `i` is slot index `i`.
    pub const fn bits(self) -> u16 {
        self.0
    }

    pub fn iter(self) -> impl Iterator<Item = Slot> {
        Slot::ALL.into_iter().filter(move |slot| self.contains(*slot))
    }
}

impl std::fmt::Debug for SlotSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Slot> for SlotSet {
    fn from_iter<I: IntoIterator<Item = Slot>>(iter: I) -> Self {
        let mut set = SlotSet::EMPTY;
        for slot in iter {
            set.insert(slot);
        }
        set
    }
}

const QUARTERS_TOP_LEFT: SlotSet =
    SlotSet::of(&[Slot::QuarterTopLeftSlash, Slot::QuarterTopLeftBackslash]);
const QUARTERS_TOP_RIGHT: SlotSet =
    SlotSet::of(&[Slot::QuarterTopRightSlash, Slot::QuarterTopRightBackslash]);
const QUARTERS_BOTTOM_LEFT: SlotSet =
    SlotSet::of(&[Slot::QuarterBottomLeftSlash, Slot::QuarterBottomLeftBackslash]);
const QUARTERS_BOTTOM_RIGHT: SlotSet = SlotSet::of(&[
    Slot::QuarterBottomRightSlash,
    Slot::QuarterBottomRightBackslash,
]);

// Not symmetric: a petite clears the quarters in its corner, but a quarter
// only clears the half stitch crossing its corner.
const fn exclusion_rule(slot: Slot) -> SlotSet {
    let extra = match slot {
        Slot::Full => SlotSet::ALL,
        Slot::HalfSlash => SlotSet::of(&[Slot::PetiteTopRight, Slot::PetiteBottomLeft])
            .union(QUARTERS_TOP_RIGHT)
            .union(QUARTERS_BOTTOM_LEFT),
        Slot::HalfBackslash => SlotSet::of(&[Slot::PetiteTopLeft, Slot::PetiteBottomRight])
            .union(QUARTERS_TOP_LEFT)
            .union(QUARTERS_BOTTOM_RIGHT),
        Slot::PetiteTopLeft => SlotSet::of(&[Slot::HalfBackslash]).union(QUARTERS_TOP_LEFT),
        Slot::PetiteTopRight => SlotSet::of(&[Slot::HalfSlash]).union(QUARTERS_TOP_RIGHT),
        Slot::PetiteBottomLeft => SlotSet::of(&[Slot::HalfSlash]).union(QUARTERS_BOTTOM_LEFT),
        Slot::PetiteBottomRight => {
            SlotSet::of(&[Slot::HalfBackslash]).union(QUARTERS_BOTTOM_RIGHT)
        }
        Slot::QuarterTopLeftSlash
        | Slot::QuarterTopLeftBackslash
        | Slot::QuarterBottomRightSlash
        | Slot::QuarterBottomRightBackslash => SlotSet::of(&[Slot::HalfBackslash]),
        Slot::QuarterTopRightSlash
        | Slot::QuarterTopRightBackslash
        | Slot::QuarterBottomLeftSlash
        | Slot::QuarterBottomLeftBackslash => SlotSet::of(&[Slot::HalfSlash]),
    };
    extra.with(slot).with(Slot::Full)
}

const fn build_affected_table() -> [SlotSet; SLOT_COUNT] {
    let mut table = [SlotSet::EMPTY; SLOT_COUNT];
    let mut i = 0;
    while i < SLOT_COUNT {
        table[i] = exclusion_rule(Slot::ALL[i]);
        i += 1;
    }
    table
}

static AFFECTED: [SlotSet; SLOT_COUNT] = build_affected_table();

/// One grid unit: up to fifteen stitches, each bound to a palette color.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell<'p> {
    pos: GridPos,
    features: SlotSet,
    colors: [Option<&'p Color>; SLOT_COUNT],
}

impl<'p> Cell<'p> {
    pub fn new(pos: GridPos) -> Self {
        Self {
            pos,
            features: SlotSet::EMPTY,
            colors: [None; SLOT_COUNT],
        }
    }

    pub fn pos(&self) -> GridPos {
        self.pos
    }

    /// Relocates the cell. Only meaningful for cells outside a grid
    /// (floating selections, snapshots); a grid keys cells by position.
    pub fn move_to(&mut self, pos: GridPos) {
        self.pos = pos;
    }

    pub fn feature_mask(&self) -> SlotSet {
        self.features
    }

    /// Adds `slot`, first clearing the slot itself and everything it excludes.
    pub fn add_feature(&mut self, slot: Slot, color: &'p Color) {
        self.remove_all(slot.affected());
        self.features.insert(slot);
        self.colors[slot.index()] = Some(color);
    }

    /// Raw slot-index entry point used by loaders. Indices outside `0..15`
    /// are a caller bug.
    pub fn add_feature_at(&mut self, index: usize, color: &'p Color) {
        debug_assert!(index < SLOT_COUNT, "slot index {index} out of range");
        if let Some(slot) = Slot::from_index(index) {
            self.add_feature(slot, color);
        }
    }

    pub fn add_full(&mut self, color: &'p Color) {
        self.add_feature(Slot::Full, color);
    }

    pub fn add_half(&mut self, orientation: Orientation, color: &'p Color) {
        self.add_feature(Slot::half(orientation), color);
    }

    pub fn add_petite(&mut self, subarea: Subarea, color: &'p Color) {
        self.add_feature(Slot::petite(subarea), color);
    }

    pub fn add_quarter(&mut self, orientation: Orientation, subarea: Subarea, color: &'p Color) {
        self.add_feature(Slot::quarter(orientation, subarea), color);
    }

    /// Adds every stitch of `other` in slot order. This is sequential
    /// insertion, not a union: later slots win conflicts.
    pub fn merge(&mut self, other: &Cell<'p>) {
        for (slot, color) in other.features() {
            self.add_feature(slot, color);
        }
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.features.contains(slot)
    }

    pub fn color(&self, slot: Slot) -> Option<&'p Color> {
        self.colors[slot.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Clears one slot without touching the others.
    pub fn remove(&mut self, slot: Slot) {
        self.features.remove(slot);
        self.colors[slot.index()] = None;
    }

    fn remove_all(&mut self, slots: SlotSet) {
        for slot in self.features.intersection(slots).iter() {
            self.remove(slot);
        }
    }

    pub fn clear(&mut self) {
        self.features = SlotSet::EMPTY;
        self.colors = [None; SLOT_COUNT];
    }

    /// Occupied slots with their colors, in slot order.
    pub fn features(&self) -> impl Iterator<Item = (Slot, &'p Color)> + '_ {
        self.features
            .iter()
            .filter_map(move |slot| self.colors[slot.index()].map(|color| (slot, color)))
    }

    /// Total thread coverage, one unit per full stitch.
    pub fn weight(&self) -> f32 {
        self.features.iter().map(Slot::weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(id: &str) -> Color {
        Color::new(id, id, [0, 0, 0]).with_category("test")
    }

    fn slots(cell: &Cell<'_>) -> Vec<Slot> {
        cell.feature_mask().iter().collect()
    }

    #[test]
    fn test_full_stitch_dominates() {
        let (a, b) = (color("a"), color("b"));
        for slot in Slot::ALL {
            let mut cell = Cell::new(GridPos::new(1, 1));
            cell.add_feature(slot, &a);
            cell.add_full(&b);

            assert!(!cell.is_empty());
            assert_eq!(cell.feature_mask(), SlotSet::of(&[Slot::Full]));
            for other in Slot::ALL.into_iter().filter(|s| *s != Slot::Full) {
                assert!(!cell.contains(other));
                assert!(cell.color(other).is_none());
            }
            assert_eq!(cell.color(Slot::Full), Some(&b));
        }
    }

    #[test]
    fn test_full_stitch_is_cleared_by_any_other_slot() {
        let c = color("c");
        for slot in Slot::ALL.into_iter().skip(1) {
            let mut cell = Cell::new(GridPos::new(0, 0));
            cell.add_full(&c);
            cell.add_feature(slot, &c);
            assert_eq!(slots(&cell), vec![slot]);
        }
    }

    #[test]
    fn test_exclusion_asymmetry() {
        let (c1, c2, c3) = (color("1"), color("2"), color("3"));
        let mut cell = Cell::new(GridPos::new(0, 0));
        cell.add_feature(Slot::PetiteTopLeft, &c3);
        cell.add_feature(Slot::HalfSlash, &c1);
        cell.add_feature(Slot::PetiteTopRight, &c2);

        assert!(!cell.contains(Slot::HalfSlash));
        assert!(cell.contains(Slot::PetiteTopRight));
        assert_eq!(cell.color(Slot::PetiteTopLeft), Some(&c3));
    }

    #[test]
    fn test_petite_clears_corner_quarters_but_not_the_reverse() {
        let c = color("c");
        let mut cell = Cell::new(GridPos::new(0, 0));
        cell.add_feature(Slot::PetiteTopLeft, &c);
        cell.add_feature(Slot::QuarterTopLeftSlash, &c);
        assert_eq!(
            slots(&cell),
            vec![Slot::PetiteTopLeft, Slot::QuarterTopLeftSlash]
        );

        cell.add_feature(Slot::PetiteTopLeft, &c);
        assert_eq!(slots(&cell), vec![Slot::PetiteTopLeft]);
    }

    #[test]
    fn test_half_stitches_coexist_with_each_other() {
        let c = color("c");
        let mut cell = Cell::new(GridPos::new(0, 0));
        cell.add_half(Orientation::Slash, &c);
        cell.add_half(Orientation::Backslash, &c);
        assert_eq!(slots(&cell), vec![Slot::HalfSlash, Slot::HalfBackslash]);

        cell.add_quarter(Orientation::Slash, Subarea::BottomRight, &c);
        assert_eq!(
            slots(&cell),
            vec![Slot::HalfSlash, Slot::QuarterBottomRightSlash]
        );
    }

    #[test]
    fn test_affected_table_includes_self_and_full() {
        for slot in Slot::ALL {
            let affected = slot.affected();
            assert!(affected.contains(slot), "{slot:?} must affect itself");
            assert!(affected.contains(Slot::Full), "{slot:?} must affect Full");
        }
        assert_eq!(Slot::Full.affected(), SlotSet::ALL);
        assert_eq!(
            Slot::HalfSlash.affected(),
            SlotSet::of(&[
                Slot::Full,
                Slot::HalfSlash,
                Slot::PetiteTopRight,
                Slot::PetiteBottomLeft,
                Slot::QuarterTopRightSlash,
                Slot::QuarterTopRightBackslash,
                Slot::QuarterBottomLeftSlash,
                Slot::QuarterBottomLeftBackslash,
            ])
        );
        assert_eq!(
            Slot::QuarterBottomRightBackslash.affected(),
            SlotSet::of(&[
                Slot::Full,
                Slot::HalfBackslash,
                Slot::QuarterBottomRightBackslash
            ])
        );
    }

    #[test]
    fn test_readding_a_slot_replaces_its_color() {
        let (a, b) = (color("a"), color("b"));
        let mut cell = Cell::new(GridPos::new(0, 0));
        cell.add_petite(Subarea::BottomLeft, &a);
        cell.add_petite(Subarea::BottomLeft, &b);
        assert_eq!(cell.feature_mask().len(), 1);
        assert_eq!(cell.color(Slot::PetiteBottomLeft), Some(&b));
    }

    #[test]
    fn test_merge_is_sequential_not_union() {
        let (a, b) = (color("a"), color("b"));
        let mut target = Cell::new(GridPos::new(2, 2));
        target.add_feature(Slot::HalfBackslash, &a);
        let mut source = Cell::new(GridPos::new(2, 2));
        source.add_feature(Slot::PetiteTopLeft, &b);

        target.merge(&source);
        assert_eq!(slots(&target), vec![Slot::PetiteTopLeft]);
        assert_eq!(target.color(Slot::PetiteTopLeft), Some(&b));
    }

    #[test]
    fn test_merge_is_not_commutative() {
        let (a, b) = (color("a"), color("b"));
        let mut half = Cell::new(GridPos::new(0, 0));
        half.add_feature(Slot::HalfBackslash, &a);
        let mut quarter = Cell::new(GridPos::new(0, 0));
        quarter.add_feature(Slot::QuarterTopLeftSlash, &b);

        let mut left = half.clone();
        left.merge(&quarter);
        let mut right = quarter.clone();
        right.merge(&half);

        assert_eq!(slots(&left), vec![Slot::QuarterTopLeftSlash]);
        assert_eq!(slots(&right), vec![Slot::HalfBackslash]);
    }

    #[test]
    fn test_remove_only_touches_one_slot() {
        let c = color("c");
        let mut cell = Cell::new(GridPos::new(0, 0));
        cell.add_petite(Subarea::TopLeft, &c);
        cell.add_petite(Subarea::BottomRight, &c);
        cell.remove(Slot::PetiteTopLeft);
        assert_eq!(slots(&cell), vec![Slot::PetiteBottomRight]);
        cell.remove(Slot::PetiteTopLeft);
        cell.remove(Slot::PetiteBottomRight);
        assert!(cell.is_empty());
        assert!(cell.features().next().is_none());
    }

    #[test]
    fn test_add_feature_at_maps_indices() {
        let c = color("c");
        let mut cell = Cell::new(GridPos::new(0, 0));
        cell.add_feature_at(9, &c);
        assert!(cell.contains(Slot::QuarterTopRightSlash));
        assert_eq!(Slot::from_index(15), None);
        assert_eq!(Slot::QuarterBottomRightBackslash.index(), 14);
    }

    #[test]
    fn test_weight_counts_coverage() {
        let c = color("c");
        let mut cell = Cell::new(GridPos::new(0, 0));
        cell.add_half(Orientation::Slash, &c);
        cell.add_quarter(Orientation::Backslash, Subarea::TopLeft, &c);
        assert_eq!(cell.weight(), 0.75);
    }
}
