use std::cmp::Ordering;
use std::collections::HashMap;
use std::collections::BinaryHeap;
use std::f32::consts::SQRT_2;

use crate::grid::TileGrid;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct Node {
    x: i32,
    y: i32,
}

#[derive(Clone, Copy)]
struct ScoredNode {
    node: Node,
    f_score: f32, // g_score + heuristic
}

impl PartialEq for ScoredNode {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.f_score == other.f_score
    }
}

impl Eq for ScoredNode {}

// BinaryHeap is a max-heap, so we reverse the ordering for min-heap behavior
impl Ord for ScoredNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f_score.total_cmp(&self.f_score)
    }
}

impl PartialOrd for ScoredNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

const NEIGHBORS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Find a path from start to goal using A* over the tile grid.
///
/// Successors are the 8 neighboring tiles, excluding walls and excluding
/// diagonal steps that would cut through two orthogonally-adjacent wall
/// tiles. Costs and heuristic are both Euclidean distance (straight 1,
/// diagonal sqrt 2), so the heuristic is consistent.
///
/// Returns the tile sequence start->goal inclusive, or `None` when no path
/// exists - callers must treat `None` as "no path", never as a partial path.
pub fn find_path(grid: &TileGrid, start: (i32, i32), goal: (i32, i32)) -> Option<Vec<(i32, i32)>> {
    if !grid.in_bounds(start.0, start.1) || !grid.is_walkable(goal.0, goal.1) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let start_node = Node { x: start.0, y: start.1 };
    let goal_node = Node { x: goal.0, y: goal.1 };

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<Node, Node> = HashMap::new();
    let mut g_score: HashMap<Node, f32> = HashMap::new();

    g_score.insert(start_node, 0.0);
    open_set.push(ScoredNode {
        node: start_node,
        f_score: heuristic(start, goal),
    });

    while let Some(current) = open_set.pop() {
        if current.node == goal_node {
            return Some(reconstruct_path(&came_from, current.node));
        }

        let current_g = *g_score.get(&current.node).unwrap_or(&f32::INFINITY);

        for (dx, dy) in NEIGHBORS {
            let nx = current.node.x + dx;
            let ny = current.node.y + dy;

            if !grid.is_walkable(nx, ny) {
                continue;
            }

            // A diagonal step may squeeze past a single wall corner but not
            // cut through two orthogonally-adjacent walls.
            if dx != 0 && dy != 0 {
                let across_x = grid.is_walkable(current.node.x + dx, current.node.y);
                let across_y = grid.is_walkable(current.node.x, current.node.y + dy);
                if !across_x && !across_y {
                    continue;
                }
            }

            let neighbor = Node { x: nx, y: ny };
            let step = if dx != 0 && dy != 0 { SQRT_2 } else { 1.0 };
            let tentative_g = current_g + step;
            let neighbor_g = *g_score.get(&neighbor).unwrap_or(&f32::INFINITY);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.node);
                g_score.insert(neighbor, tentative_g);
                open_set.push(ScoredNode {
                    node: neighbor,
                    f_score: tentative_g + heuristic((nx, ny), goal),
                });
            }
        }
    }

    None // No path found
}

/// Euclidean distance heuristic
fn heuristic(from: (i32, i32), to: (i32, i32)) -> f32 {
    let dx = (from.0 - to.0) as f32;
    let dy = (from.1 - to.1) as f32;
    (dx * dx + dy * dy).sqrt()
}

/// Reconstruct the path from the came_from map, start inclusive
fn reconstruct_path(came_from: &HashMap<Node, Node>, mut current: Node) -> Vec<(i32, i32)> {
    let mut path = vec![(current.x, current.y)];

    while let Some(&prev) = came_from.get(&current) {
        path.push((prev.x, prev.y));
        current = prev;
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{Biome, Tile, TileKind};

    fn grid_from_rows(rows: &[&str]) -> TileGrid {
        let height = rows.len();
        let width = rows[0].len();
        let mut tiles = Vec::with_capacity(width * height);
        for row in rows {
            for ch in row.chars() {
                let kind = if ch == '#' { TileKind::Rock } else { TileKind::Grass };
                tiles.push(Tile::new(kind, Biome::Plains));
            }
        }
        TileGrid::new(width, height, tiles)
    }

    fn assert_path_valid(grid: &TileGrid, path: &[(i32, i32)], start: (i32, i32), goal: (i32, i32)) {
        assert_eq!(*path.first().unwrap(), start);
        assert_eq!(*path.last().unwrap(), goal);
        for pair in path.windows(2) {
            let (ax, ay) = pair[0];
            let (bx, by) = pair[1];
            let (dx, dy) = (bx - ax, by - ay);
            assert!(dx.abs() <= 1 && dy.abs() <= 1 && (dx, dy) != (0, 0), "non-adjacent step");
            assert!(grid.is_walkable(bx, by), "step onto wall at {:?}", pair[1]);
            if dx != 0 && dy != 0 {
                assert!(
                    grid.is_walkable(ax + dx, ay) || grid.is_walkable(ax, ay + dy),
                    "diagonal cut through two walls at {:?}", pair[0]
                );
            }
        }
    }

    #[test]
    fn open_field_path_is_direct() {
        let grid = grid_from_rows(&["......", "......", "......", "......"]);
        let path = find_path(&grid, (0, 0), (3, 3)).unwrap();
        assert_path_valid(&grid, &path, (0, 0), (3, 3));
        // Pure diagonal run: 4 tiles including both endpoints.
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn maze_path_detours_around_walls() {
        let grid = grid_from_rows(&[
            "......",
            ".####.",
            ".#....",
            ".#.##.",
            "...#..",
        ]);
        let start = (0, 0);
        let goal = (5, 4);
        let path = find_path(&grid, start, goal).unwrap();
        assert_path_valid(&grid, &path, start, goal);
    }

    #[test]
    fn no_path_is_explicit_none() {
        let grid = grid_from_rows(&[
            "...#..",
            "...#..",
            "####..",
        ]);
        assert_eq!(find_path(&grid, (0, 0), (5, 0)), None);
    }

    #[test]
    fn goal_on_wall_is_no_path() {
        let grid = grid_from_rows(&["..#", "..."]);
        assert_eq!(find_path(&grid, (0, 0), (2, 0)), None);
    }

    #[test]
    fn diagonal_through_two_walls_is_blocked() {
        // Both orthogonal neighbors of the diagonal step are walls, so the
        // start is sealed in.
        let grid = grid_from_rows(&[
            ".#.",
            "#..",
            "...",
        ]);
        assert_eq!(find_path(&grid, (0, 0), (2, 2)), None);
    }

    #[test]
    fn diagonal_past_single_wall_corner_is_allowed() {
        let grid = grid_from_rows(&[
            ".#.",
            "...",
            "...",
        ]);
        let path = find_path(&grid, (0, 0), (1, 1)).unwrap();
        assert_eq!(path, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn trivial_path_is_start_only() {
        let grid = grid_from_rows(&["..", ".."]);
        assert_eq!(find_path(&grid, (1, 1), (1, 1)), Some(vec![(1, 1)]));
    }
}
