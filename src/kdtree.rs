//! Static k-d tree over palette colors for nearest-color lookups during
//! image import.

use crate::colors::{Color, Palette};

/// Result of a nearest-color query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nearest<'p> {
    Color(&'p Color),
    /// The query landed closest to the transparent sentinel.
    Transparent,
}

#[derive(Debug, Clone, Copy)]
struct Entry<'p> {
    rgb: [u8; 3],
    /// `None` marks the transparent sentinel.
    color: Option<&'p Color>,
}

#[derive(Debug, Clone)]
struct Node<'p> {
    entry: Entry<'p>,
    left: Option<usize>,
    right: Option<usize>,
}

/// Immutable once built, so queries may run from many threads at once.
#[derive(Debug, Clone)]
pub struct ColorIndex<'p> {
    nodes: Vec<Node<'p>>,
    root: Option<usize>,
}

impl<'p> ColorIndex<'p> {
    /// Builds the index over `colors`. When `transparent` is given, colors
    /// with exactly that RGB value are left out and a sentinel with that
    /// value is appended last.
    pub fn new<I>(colors: I, transparent: Option<[u8; 3]>) -> Self
    where
        I: IntoIterator<Item = &'p Color>,
    {
        let mut entries: Vec<Entry<'p>> = colors
            .into_iter()
            .filter(|color| Some(color.rgb()) != transparent)
            .map(|color| Entry {
                rgb: color.rgb(),
                color: Some(color),
            })
            .collect();
        if let Some(rgb) = transparent {
            entries.push(Entry { rgb, color: None });
        }

        let mut index = Self {
            nodes: Vec::with_capacity(entries.len()),
            root: None,
        };
        index.root = index.build(&mut entries, 0);
        index
    }

    pub fn from_palette(palette: &'p Palette, transparent: Option<[u8; 3]>) -> Self {
        Self::new(palette.iter(), transparent)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn build(&mut self, entries: &mut [Entry<'p>], depth: usize) -> Option<usize> {
        if entries.is_empty() {
            return None;
        }
        let axis = depth % 3;
        entries.sort_by_key(|entry| entry.rgb[axis]);
        let median = entries.len() / 2;
        let entry = entries[median];
        let (lower, upper) = entries.split_at_mut(median);

        let left = self.build(lower, depth + 1);
        let right = self.build(&mut upper[1..], depth + 1);
        self.nodes.push(Node { entry, left, right });
        Some(self.nodes.len() - 1)
    }

    /// Nearest entry by squared Euclidean RGB distance. Ties go to the
    /// candidate reached first: near subtree, then far subtree, then the
    /// node itself. Returns `None` only for an empty index.
    pub fn nearest(&self, rgb: [u8; 3]) -> Option<Nearest<'p>> {
        let root = self.root?;
        let mut best: Option<(Entry<'p>, i32)> = None;
        self.search(root, rgb, 0, &mut best);
        best.map(|(entry, _)| match entry.color {
            Some(color) => Nearest::Color(color),
            None => Nearest::Transparent,
        })
    }

    /// Like [`ColorIndex::nearest`], but folds the transparent sentinel into `None`.
    pub fn nearest_color(&self, rgb: [u8; 3]) -> Option<&'p Color> {
        match self.nearest(rgb)? {
            Nearest::Color(color) => Some(color),
            Nearest::Transparent => None,
        }
    }

    fn search(
        &self,
        index: usize,
        query: [u8; 3],
        depth: usize,
        best: &mut Option<(Entry<'p>, i32)>,
    ) {
        let node = &self.nodes[index];
        let axis = depth % 3;
        let diff = i32::from(query[axis]) - i32::from(node.entry.rgb[axis]);
        let (near, far) = if diff <= 0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(near) = near {
            self.search(near, query, depth + 1, best);
        }
        if let Some(far) = far {
            if best.map_or(true, |(_, dist)| diff * diff < dist) {
                self.search(far, query, depth + 1, best);
            }
        }

        let dist = distance(query, node.entry.rgb);
        if best.map_or(true, |(_, best_dist)| dist < best_dist) {
            *best = Some((node.entry, dist));
        }
    }
}

fn distance(a: [u8; 3], b: [u8; 3]) -> i32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = i32::from(x) - i32::from(y);
            d * d
        })
        .sum()
}
