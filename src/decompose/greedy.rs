//! Greedy maximal-volume decomposition

use serde::{Deserialize, Serialize};

use super::policy::{Axis, GrowthPolicy};
use crate::core::types::{IVec3, Position};
use crate::math::Qube;

/// Read access to a grid of values.
///
/// Lookups must be deterministic for the duration of one decomposition.
/// Any `Fn(Position) -> T` closure is a lookup.
pub trait TileLookup<T> {
    fn tile_at(&self, pos: Position) -> T;
}

impl<T, F: Fn(Position) -> T> TileLookup<T> for F {
    fn tile_at(&self, pos: Position) -> T {
        self(pos)
    }
}

/// A volume in which every cell holds `tile`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cover<T> {
    pub tile: T,
    pub qube: Qube,
}

impl<T> Cover<T> {
    pub fn new(tile: T, qube: Qube) -> Self {
        Self { tile, qube }
    }
}

/// Visited flags for every cell of the query region
struct Visited {
    region: Qube,
    size: IVec3,
    flags: Vec<bool>,
}

impl Visited {
    fn new(region: Qube) -> Self {
        Self {
            region,
            size: region.size(),
            flags: vec![false; region.cell_count()],
        }
    }

    /// Caller guarantees `pos` lies inside the region
    fn slot(&self, pos: Position) -> usize {
        let local = pos - self.region.anchor;
        (local.x as usize * self.size.y as usize + local.y as usize) * self.size.z as usize
            + local.z as usize
    }

    fn contains(&self, pos: Position) -> bool {
        self.flags[self.slot(pos)]
    }

    fn insert(&mut self, pos: Position) {
        let slot = self.slot(pos);
        self.flags[slot] = true;
    }
}

/// Cells of the plane at coordinate `plane` along `axis`, spanning the
/// cover's full cross-section on the other two axes.
fn plane_cells(cover: Qube, axis: Axis, plane: i32) -> impl Iterator<Item = Position> {
    let [a, b] = axis.others();
    let (min, max) = (cover.min(), cover.max());
    let (a_range, b_range) = (min[a.index()]..=max[a.index()], min[b.index()]..=max[b.index()]);
    a_range.flat_map(move |i| {
        b_range.clone().map(move |j| {
            let mut pos = IVec3::ZERO;
            pos[axis.index()] = plane;
            pos[a.index()] = i;
            pos[b.index()] = j;
            pos
        })
    })
}

struct Decomposer<'a, T, L: ?Sized, P: ?Sized> {
    lookup: &'a L,
    region: Qube,
    empty: &'a T,
    policy: &'a mut P,
    visited: Visited,
}

impl<T, L, P> Decomposer<'_, T, L, P>
where
    T: PartialEq + Clone,
    L: TileLookup<T> + ?Sized,
    P: GrowthPolicy + ?Sized,
{
    fn accepts(&self, cover: Qube, tile: &T, axis: Axis, plane: i32) -> bool {
        let lateral = axis != Axis::Z && self.policy.vertical_bias();
        plane_cells(cover, axis, plane).all(|pos| {
            self.region.contains(pos)
                && !self.visited.contains(pos)
                && self.lookup.tile_at(pos) == *tile
                && !(lateral
                    && (self.lookup.tile_at(pos - IVec3::Z) == *tile
                        || self.lookup.tile_at(pos + IVec3::Z) == *tile))
        })
    }

    /// Grow a seeded cover until no axis accepts another plane
    fn grow(&mut self, seed: Position, tile: &T) -> Qube {
        let mut cover = Qube::cell(seed);
        loop {
            let order = self.policy.axis_order();
            let mut grew = false;
            for axis in order {
                let n = axis.index();
                for plane in [cover.min()[n] - 1, cover.max()[n] + 1] {
                    if !self.accepts(cover, tile, axis, plane) {
                        continue;
                    }
                    for pos in plane_cells(cover, axis, plane) {
                        self.visited.insert(pos);
                    }
                    if plane < cover.anchor[n] {
                        cover.anchor[n] = plane;
                    }
                    cover.extent[n] += 1;
                    grew = true;
                    log::trace!("grew cover at {seed} along {axis:?} to {:?}", cover.to_array());
                }
                if grew && self.policy.ends_round(axis, &order) {
                    break;
                }
            }
            if !grew {
                return cover;
            }
        }
    }

    fn run(&mut self) -> Vec<Cover<T>> {
        let mut covers = Vec::new();
        for pos in self.region.cells() {
            if self.visited.contains(pos) {
                continue;
            }
            self.visited.insert(pos);
            let tile = self.lookup.tile_at(pos);
            if tile == *self.empty {
                continue;
            }
            let qube = self.grow(pos, &tile);
            covers.push(Cover::new(tile, qube));
        }
        covers
    }
}

/// Decompose every non-empty cell of `region` into covers.
///
/// Cells are scanned x outermost, z innermost. Each unvisited non-empty cell
/// seeds a single-cell cover which grows one plane at a time, in the order the
/// policy chooses, as long as the whole plane lies in `region`, is unvisited
/// and holds the seed's value. The result partitions the non-empty cells of
/// `region`: covers never overlap and every cover holds a single value.
///
/// The decomposition is greedy, so the number of covers is not minimal.
///
/// # Example
/// ```
/// use tilecover::core::Position;
/// use tilecover::decompose::{decompose, Balanced};
/// use tilecover::math::Qube;
///
/// // a 3x1x1 bar of ones
/// let covers = decompose(
///     &|p: Position| (p.y == 0 && p.z == 0) as u8,
///     Qube::from_array([0, 0, 0, 2, 1, 1]),
///     &0,
///     &mut Balanced,
/// );
/// assert_eq!(covers.len(), 1);
/// assert_eq!(covers[0].qube.to_array(), [0, 0, 0, 2, 0, 0]);
/// ```
pub fn decompose<T, L, P>(lookup: &L, region: Qube, empty: &T, policy: &mut P) -> Vec<Cover<T>>
where
    T: PartialEq + Clone,
    L: TileLookup<T> + ?Sized,
    P: GrowthPolicy + ?Sized,
{
    let mut decomposer = Decomposer {
        lookup,
        region,
        empty,
        policy,
        visited: Visited::new(region),
    };
    let covers = decomposer.run();
    log::debug!(
        "decomposed {} cells of {:?} into {} covers",
        region.cell_count(),
        region.to_array(),
        covers.len()
    );
    covers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompose::policy::{Balanced, Shuffled, Vertical, Wide};
    use crate::grid::{Tile, Tilemap};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn q(a: [i32; 6]) -> Qube {
        Qube::from_array(a)
    }

    /// Coverage, purity and disjointness of a decomposition
    fn assert_partition<T, L>(lookup: &L, region: Qube, empty: &T, covers: &[Cover<T>])
    where
        T: PartialEq + Clone + std::fmt::Debug,
        L: TileLookup<T>,
    {
        let mut owner = HashMap::new();
        for (i, cover) in covers.iter().enumerate() {
            assert!(region.clamp(&cover.qube) == Some(cover.qube), "cover {i} leaves the region");
            for pos in cover.qube.cells() {
                assert_eq!(lookup.tile_at(pos), cover.tile, "impure cover {i} at {pos}");
                assert!(owner.insert(pos, i).is_none(), "{pos} covered twice");
            }
        }
        for pos in region.cells() {
            let non_empty = lookup.tile_at(pos) != *empty;
            assert_eq!(owner.contains_key(&pos), non_empty, "coverage mismatch at {pos}");
        }
    }

    /// Deterministic pseudo-random field of small values
    fn noise_field(seed: u32) -> impl Fn(Position) -> u8 {
        move |p: Position| {
            let mut h = seed ^ (p.x as u32).wrapping_mul(0x45d9f3b);
            h = (h ^ (p.y as u32)).wrapping_mul(0x45d9f3b);
            h = (h ^ (p.z as u32)).wrapping_mul(0x45d9f3b);
            ((h >> 16) % 4) as u8
        }
    }

    #[test]
    fn test_bounding_qube_decomposition() {
        let mut tilemap = Tilemap::default();
        tilemap.dig(q([10, 5, 7, 0, 1, 0]));
        tilemap.ramp(q([9, 6, 6, 0, 1, 1]));

        let res = decompose(
            &tilemap,
            tilemap.bounding_qube().unwrap(),
            &tilemap.default_tile(),
            &mut Balanced,
        );
        assert_eq!(
            res,
            vec![
                Cover::new(Tile::Ramp, q([9, 6, 6, 0, 1, 1])),
                Cover::new(Tile::Floor, q([10, 5, 7, 0, 1, 0])),
            ]
        );
    }

    #[test]
    fn test_region_limits_growth() {
        let mut tilemap = Tilemap::default();
        tilemap.dig(q([10, 5, 7, 0, 1, 0]));
        tilemap.ramp(q([9, 6, 6, 0, 1, 1]));

        let res = decompose(&tilemap, q([9, 6, 6, 0, 1, 0]), &Tile::Wall, &mut Balanced);
        assert_eq!(res, vec![Cover::new(Tile::Ramp, q([9, 6, 6, 0, 1, 0]))]);
    }

    #[test]
    fn test_vertical_preference_splits_columns() {
        let mut tilemap = Tilemap::default();
        tilemap.dig(q([3, 3, 4, 1, 1, 0]));
        tilemap.dig(q([4, 4, 5, 0, 0, 0]));

        let region = tilemap.bounding_qube().unwrap();
        let res = decompose(&tilemap, region, &Tile::Wall, &mut Vertical::new());
        assert_eq!(
            res,
            vec![
                Cover::new(Tile::Floor, q([3, 3, 4, 1, 0, 0])),
                Cover::new(Tile::Floor, q([3, 4, 4, 0, 0, 0])),
                Cover::new(Tile::Floor, q([4, 4, 4, 0, 0, 1])),
            ]
        );
        assert_partition(&tilemap, region, &Tile::Wall, &res);
    }

    #[test]
    fn test_balanced_merges_same_shape() {
        let mut tilemap = Tilemap::default();
        tilemap.dig(q([3, 3, 4, 1, 1, 0]));
        tilemap.dig(q([4, 4, 5, 0, 0, 0]));

        let res = decompose(&tilemap, tilemap.bounding_qube().unwrap(), &Tile::Wall, &mut Balanced);
        assert_eq!(
            res,
            vec![
                Cover::new(Tile::Floor, q([3, 3, 4, 1, 1, 0])),
                Cover::new(Tile::Floor, q([4, 4, 5, 0, 0, 0])),
            ]
        );
    }

    #[test]
    fn test_vertical_column_stays_whole() {
        let mut tilemap = Tilemap::default();
        tilemap.dig(q([1, 1, 1, 3, 0, 0]));
        tilemap.dig(q([3, 1, 2, 0, 0, 3]));

        let region = tilemap.bounding_qube().unwrap();
        let res = decompose(&tilemap, region, &Tile::Wall, &mut Vertical::new());
        assert_eq!(
            res,
            vec![
                Cover::new(Tile::Floor, q([1, 1, 1, 1, 0, 0])),
                Cover::new(Tile::Floor, q([3, 1, 1, 0, 0, 4])),
                Cover::new(Tile::Floor, q([4, 1, 1, 0, 0, 0])),
            ]
        );
        assert_partition(&tilemap, region, &Tile::Wall, &res);
    }

    #[test]
    fn test_empty_region() {
        let tilemap = Tilemap::default();
        let res = decompose(&tilemap, q([0, 0, 0, 5, 5, 5]), &Tile::Wall, &mut Balanced);
        assert!(res.is_empty());
    }

    #[test]
    fn test_solid_block_is_one_cover() {
        let region = q([-2, -2, -2, 4, 4, 4]);
        let res = decompose(&|_: Position| 1u8, region, &0, &mut Balanced);
        assert_eq!(res, vec![Cover::new(1, region)]);
    }

    #[test]
    fn test_partition_holds_for_every_policy() {
        let region = q([0, 0, 0, 7, 6, 5]);
        for seed in 0..4 {
            let field = noise_field(seed);
            let policies: Vec<Box<dyn GrowthPolicy>> = vec![
                Box::new(Balanced),
                Box::new(Vertical::new()),
                Box::new(Vertical::jittered(StdRng::seed_from_u64(seed as u64))),
                Box::new(Wide::jittered(StdRng::seed_from_u64(seed as u64))),
                Box::new(Shuffled::new(StdRng::seed_from_u64(seed as u64))),
            ];
            for mut policy in policies {
                let covers = decompose(&field, region, &0, &mut policy);
                assert_partition(&field, region, &0, &covers);
            }
        }
    }

    #[test]
    fn test_balanced_is_deterministic() {
        let region = q([0, 0, 0, 9, 9, 3]);
        let field = noise_field(11);
        let first = decompose(&field, region, &0, &mut Balanced);
        let second = decompose(&field, region, &0, &mut Balanced);
        assert_eq!(first, second);
    }

    #[test]
    fn test_seeded_policy_is_reproducible() {
        let region = q([0, 0, 0, 9, 9, 3]);
        let field = noise_field(5);
        let run = |seed| {
            decompose(&field, region, &0, &mut Shuffled::new(StdRng::seed_from_u64(seed)))
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_redecomposition_is_stable() {
        let region = q([0, 0, 0, 8, 8, 4]);
        let field = noise_field(23);
        let covers = decompose(&field, region, &0, &mut Balanced);

        // label every cell with the cover that owns it
        let owner = |p: Position| covers.iter().position(|c| c.qube.contains(p));
        let again = decompose(&owner, region, &None, &mut Balanced);

        let qubes: Vec<_> = covers.iter().map(|c| c.qube).collect();
        let again_qubes: Vec<_> = again.iter().map(|c| c.qube).collect();
        assert_eq!(qubes, again_qubes);
    }

    #[test]
    fn test_generic_over_values() {
        // depth-of-nearest-stair style scalar field
        let depth = |p: Position| if p.x < 0 { i64::MAX } else { (p.x / 2) as i64 };
        let region = q([-1, 0, 0, 5, 1, 0]);
        let covers = decompose(&depth, region, &i64::MAX, &mut Balanced);
        assert_eq!(covers.len(), 3);
        assert_partition(&depth, region, &i64::MAX, &covers);
    }
}
