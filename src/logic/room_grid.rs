//! Floor/room grid layout for a boarding house
//!
//! Rooms are numbered `1..=total_rooms` and split across floors either by an
//! explicit per-floor configuration or evenly (earlier floors take the extra
//! rooms). Tenants are then dropped into their numbered room; tenants whose
//! room number is missing, non-numeric, out of range or already taken fill
//! the first empty room instead.

use chrono::NaiveDate;

use crate::api::{BoardingHouse, Tenant};
use crate::logic::room_status::{derive_room_status, RoomStatus};

/// Largest house the grid will lay out; bigger counts are clamped
pub const MAX_ROOMS: u32 = 2_000;
pub const MAX_FLOORS: u32 = 200;

/// Clamp server-supplied counts to what the grid can lay out
fn bounded_counts(total_rooms: u32, total_floors: u32) -> (u32, u32) {
    let rooms = total_rooms.min(MAX_ROOMS);
    let floors = total_floors.clamp(1, MAX_FLOORS);
    if rooms != total_rooms || total_floors > MAX_FLOORS {
        tracing::warn!(
            total_rooms,
            total_floors,
            rooms,
            floors,
            "house size out of range, clamping"
        );
    }
    (rooms, floors)
}

/// Number of rooms on each floor
///
/// Floor `i` uses `floor_config[i]` when present (clamped to the rooms still
/// unassigned), otherwise the ceiling of remaining rooms over remaining floors.
/// Rooms left after the last floor are added to it, so the counts always sum
/// to `total_rooms`. A house with zero floors is laid out as one floor.
/// Counts above [`MAX_ROOMS`] and [`MAX_FLOORS`] are clamped.
///
/// # Examples
/// ```
/// use wargatui::logic::room_grid::partition_floors;
///
/// assert_eq!(partition_floors(10, 3, &[]), vec![4, 3, 3]);
/// assert_eq!(partition_floors(10, 3, &[2, 5]), vec![2, 5, 3]);
/// assert_eq!(partition_floors(6, 2, &[2, 2]), vec![2, 4]);
/// assert_eq!(partition_floors(5, 0, &[]), vec![5]);
/// ```
pub fn partition_floors(total_rooms: u32, total_floors: u32, floor_config: &[u32]) -> Vec<u32> {
    let (rooms, floors) = bounded_counts(total_rooms, total_floors);
    split_floors(rooms, floors, floor_config)
}

fn split_floors(total_rooms: u32, floors: u32, floor_config: &[u32]) -> Vec<u32> {
    let mut remaining = total_rooms;
    let mut counts = Vec::with_capacity(floors as usize);

    for i in 0..floors {
        let floors_left = floors - i;
        let count = match floor_config.get(i as usize) {
            Some(configured) => (*configured).min(remaining),
            None => remaining.div_ceil(floors_left),
        };
        counts.push(count);
        remaining -= count;
    }

    if remaining > 0 {
        if let Some(last) = counts.last_mut() {
            *last += remaining;
        }
    }

    counts
}

/// Parse a room number as a plain positive integer
///
/// Labels such as `"A1"` or `"5A"` are not numeric and yield `None`. Leading
/// digits are not enough: `"5A"` is not read as room 5, so its tenant takes
/// the first empty room instead.
pub fn parse_room_number(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomSlot {
    /// 1-based room number
    pub number: u32,
    pub tenant: Option<Tenant>,
}

impl RoomSlot {
    pub fn status(&self, today: NaiveDate) -> RoomStatus {
        derive_room_status(self.tenant.as_ref(), today)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Floor {
    /// 1-based floor number
    pub number: u32,
    pub rooms: Vec<RoomSlot>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomGrid {
    pub floors: Vec<Floor>,
    /// Tenants that found no empty room
    pub unplaced: Vec<Tenant>,
}

impl RoomGrid {
    pub fn for_house(house: &BoardingHouse) -> Self {
        build_room_grid(
            house.total_rooms,
            house.total_floors,
            &house.floor_config,
            &house.tenants,
        )
    }

    pub fn room(&self, cursor: GridCursor) -> Option<&RoomSlot> {
        self.floors.get(cursor.floor)?.rooms.get(cursor.room)
    }

    pub fn room_count(&self) -> usize {
        self.floors.iter().map(|f| f.rooms.len()).sum()
    }

    pub fn slots(&self) -> impl Iterator<Item = &RoomSlot> {
        self.floors.iter().flat_map(|f| f.rooms.iter())
    }

    pub fn statuses(&self, today: NaiveDate) -> impl Iterator<Item = RoomStatus> + '_ {
        self.slots().map(move |slot| slot.status(today))
    }

    fn widths(&self) -> Vec<usize> {
        self.floors.iter().map(|f| f.rooms.len()).collect()
    }
}

/// Lay out rooms on floors and assign tenants to rooms
pub fn build_room_grid(
    total_rooms: u32,
    total_floors: u32,
    floor_config: &[u32],
    tenants: &[Tenant],
) -> RoomGrid {
    let (total_rooms, total_floors) = bounded_counts(total_rooms, total_floors);
    let room_count = total_rooms as usize;
    let mut assignment: Vec<Option<usize>> = vec![None; room_count];
    let mut pending = Vec::new();

    // Numbered rooms first, so a fallback tenant never steals a room that
    // belongs to a later tenant in the list
    for (idx, tenant) in tenants.iter().enumerate() {
        let slot = tenant
            .room_number
            .as_deref()
            .and_then(parse_room_number)
            .map(|n| n as usize - 1)
            .filter(|slot| *slot < room_count);

        match slot {
            Some(slot) if assignment[slot].is_none() => assignment[slot] = Some(idx),
            _ => pending.push(idx),
        }
    }

    let mut unplaced = Vec::new();
    for idx in pending {
        match assignment.iter().position(Option::is_none) {
            Some(slot) => assignment[slot] = Some(idx),
            None => {
                tracing::warn!(
                    tenant_id = tenants[idx].id,
                    room_number = ?tenants[idx].room_number,
                    "no empty room left for tenant"
                );
                unplaced.push(tenants[idx].clone());
            }
        }
    }

    let mut next_room = 0usize;
    let floors = split_floors(total_rooms, total_floors, floor_config)
        .into_iter()
        .enumerate()
        .map(|(floor_idx, count)| {
            let rooms = (next_room..next_room + count as usize)
                .map(|slot| RoomSlot {
                    number: slot as u32 + 1,
                    tenant: assignment[slot].map(|idx| tenants[idx].clone()),
                })
                .collect();
            next_room += count as usize;
            Floor {
                number: floor_idx as u32 + 1,
                rooms,
            }
        })
        .collect();

    RoomGrid { floors, unplaced }
}

/// Selected room, as (floor index, room index within the floor)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridCursor {
    pub floor: usize,
    pub room: usize,
}

impl GridCursor {
    fn to_flat(self, widths: &[usize]) -> usize {
        widths.iter().take(self.floor).sum::<usize>() + self.room
    }

    fn from_flat(flat: usize, widths: &[usize]) -> Self {
        let mut offset = 0;
        for (floor, width) in widths.iter().enumerate() {
            if flat < offset + width {
                return GridCursor {
                    floor,
                    room: flat - offset,
                };
            }
            offset += width;
        }
        GridCursor::default()
    }

    /// Next room, continuing on the next floor and wrapping to the first room
    pub fn right(self, grid: &RoomGrid) -> Self {
        let widths = grid.widths();
        let total: usize = widths.iter().sum();
        if total == 0 {
            return GridCursor::default();
        }
        let flat = self.clamp(grid).to_flat(&widths);
        Self::from_flat((flat + 1) % total, &widths)
    }

    /// Previous room, continuing on the previous floor and wrapping to the last room
    pub fn left(self, grid: &RoomGrid) -> Self {
        let widths = grid.widths();
        let total: usize = widths.iter().sum();
        if total == 0 {
            return GridCursor::default();
        }
        let flat = self.clamp(grid).to_flat(&widths);
        Self::from_flat((flat + total - 1) % total, &widths)
    }

    /// Same position one floor up (higher floor number), clamped to its width
    pub fn up(self, grid: &RoomGrid) -> Self {
        let current = self.clamp(grid);
        let widths = grid.widths();
        match (current.floor + 1..widths.len()).find(|f| widths[*f] > 0) {
            Some(floor) => GridCursor {
                floor,
                room: current.room.min(widths[floor] - 1),
            },
            None => current,
        }
    }

    /// Same position one floor down, clamped to its width
    pub fn down(self, grid: &RoomGrid) -> Self {
        let current = self.clamp(grid);
        let widths = grid.widths();
        match (0..current.floor).rev().find(|f| widths[*f] > 0) {
            Some(floor) => GridCursor {
                floor,
                room: current.room.min(widths[floor] - 1),
            },
            None => current,
        }
    }

    /// Pull the cursor back onto an existing room after the grid changed
    pub fn clamp(self, grid: &RoomGrid) -> Self {
        let widths = grid.widths();
        if widths.iter().all(|w| *w == 0) {
            return GridCursor::default();
        }

        let floor = self.floor.min(widths.len() - 1);
        if widths[floor] == 0 {
            return Self::from_flat(0, &widths);
        }

        GridCursor {
            floor,
            room: self.room.min(widths[floor] - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(id: u64, room: Option<&str>) -> Tenant {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Penghuni {}", id),
            "room_number": room,
        }))
        .unwrap()
    }

    fn tenant_ids(grid: &RoomGrid) -> Vec<Option<u64>> {
        grid.slots()
            .map(|slot| slot.tenant.as_ref().map(|t| t.id))
            .collect()
    }

    #[test]
    fn test_partition_even_split() {
        assert_eq!(partition_floors(9, 3, &[]), vec![3, 3, 3]);
        assert_eq!(partition_floors(7, 2, &[]), vec![4, 3]);
    }

    #[test]
    fn test_partition_clamps_oversized_config() {
        assert_eq!(partition_floors(5, 2, &[8, 3]), vec![5, 0]);
    }

    #[test]
    fn test_partition_more_floors_than_rooms() {
        assert_eq!(partition_floors(2, 4, &[]), vec![1, 1, 0, 0]);
        assert_eq!(partition_floors(0, 2, &[]), vec![0, 0]);
    }

    #[test]
    fn test_oversized_house_is_clamped() {
        let counts = partition_floors(u32::MAX, u32::MAX, &[]);
        assert_eq!(counts.len(), MAX_FLOORS as usize);
        assert_eq!(counts.iter().sum::<u32>(), MAX_ROOMS);

        let grid = build_room_grid(u32::MAX, 1, &[], &[tenant(1, Some("3"))]);
        assert_eq!(grid.room_count(), MAX_ROOMS as usize);
        assert_eq!(tenant_ids(&grid)[2], Some(1));
        assert!(grid.unplaced.is_empty());
    }

    #[test]
    fn test_parse_room_number() {
        assert_eq!(parse_room_number("5"), Some(5));
        assert_eq!(parse_room_number(" 12 "), Some(12));
        assert_eq!(parse_room_number("0"), None);
        assert_eq!(parse_room_number("A1"), None);
        assert_eq!(parse_room_number("5A"), None);
        assert_eq!(parse_room_number("-3"), None);
    }

    #[test]
    fn test_rooms_numbered_across_floors() {
        let grid = build_room_grid(10, 3, &[], &[]);
        let numbers: Vec<Vec<u32>> = grid
            .floors
            .iter()
            .map(|f| f.rooms.iter().map(|r| r.number).collect())
            .collect();
        assert_eq!(
            numbers,
            vec![vec![1, 2, 3, 4], vec![5, 6, 7], vec![8, 9, 10]]
        );
        assert_eq!(grid.floors[2].number, 3);
    }

    #[test]
    fn test_fallback_does_not_steal_numbered_room() {
        // "A1" comes first in the list but room 1 belongs to tenant 2
        let tenants = vec![tenant(1, Some("A1")), tenant(2, Some("1"))];
        let grid = build_room_grid(3, 1, &[], &tenants);
        assert_eq!(tenant_ids(&grid), vec![Some(2), Some(1), None]);
    }

    #[test]
    fn test_duplicate_room_number_falls_back() {
        let tenants = vec![tenant(1, Some("2")), tenant(2, Some("2"))];
        let grid = build_room_grid(3, 1, &[], &tenants);
        assert_eq!(tenant_ids(&grid), vec![Some(2), Some(1), None]);
    }

    #[test]
    fn test_overflow_tenants_are_unplaced() {
        let tenants = vec![tenant(1, None), tenant(2, Some("9")), tenant(3, None)];
        let grid = build_room_grid(2, 1, &[], &tenants);
        assert_eq!(tenant_ids(&grid), vec![Some(1), Some(2)]);
        assert_eq!(grid.unplaced.len(), 1);
        assert_eq!(grid.unplaced[0].id, 3);
    }

    #[test]
    fn test_cursor_wraps_across_floors() {
        let grid = build_room_grid(5, 2, &[], &[]); // [3, 2]
        let c = GridCursor { floor: 0, room: 2 };
        assert_eq!(c.right(&grid), GridCursor { floor: 1, room: 0 });
        assert_eq!(
            GridCursor { floor: 1, room: 1 }.right(&grid),
            GridCursor { floor: 0, room: 0 }
        );
        assert_eq!(
            GridCursor::default().left(&grid),
            GridCursor { floor: 1, room: 1 }
        );
    }

    #[test]
    fn test_cursor_up_down_clamps_room() {
        let grid = build_room_grid(5, 2, &[], &[]); // [3, 2]
        let c = GridCursor { floor: 0, room: 2 };
        assert_eq!(c.up(&grid), GridCursor { floor: 1, room: 1 });
        assert_eq!(c.down(&grid), c);
        assert_eq!(c.up(&grid).up(&grid), GridCursor { floor: 1, room: 1 });
    }

    #[test]
    fn test_cursor_skips_empty_floors() {
        let grid = build_room_grid(2, 3, &[1, 0, 1], &[]);
        let c = GridCursor::default();
        assert_eq!(c.up(&grid), GridCursor { floor: 2, room: 0 });
        assert_eq!(c.right(&grid), GridCursor { floor: 2, room: 0 });
    }

    #[test]
    fn test_cursor_clamp_after_grid_shrinks() {
        let grid = build_room_grid(3, 1, &[], &[]);
        let c = GridCursor { floor: 4, room: 9 };
        assert_eq!(c.clamp(&grid), GridCursor { floor: 0, room: 2 });

        let empty = RoomGrid::default();
        assert_eq!(c.clamp(&empty), GridCursor::default());
        assert!(empty.room(GridCursor::default()).is_none());
    }
}
