use std::collections::HashSet;

use log::debug;
use pathfinding::prelude::bfs;
use thiserror::Error;

/// (row, col) in interior coordinates; row -1 is the entry gap in the top
/// wall and row == height the exit gap in the bottom wall.
pub type Cell = (i32, i32);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValleyError {
    #[error("a valley needs walls around at least one open row")]
    TooSmall,
    #[error("row {0:?} does not match the valley width")]
    RaggedRow(String),
    #[error("wall row {0:?} has no gap")]
    MissingGap(String),
    #[error("unexpected cell {0:?}")]
    UnknownCell(char),
    #[error("no blizzard-free crossing exists")]
    Impassable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    fn delta(self) -> (i32, i32) {
        match self {
            Heading::Up => (-1, 0),
            Heading::Down => (1, 0),
            Heading::Left => (0, -1),
            Heading::Right => (0, 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Valley {
    height: i32,
    width: i32,
    entry: Cell,
    exit: Cell,
    blizzards: Vec<(Cell, Heading)>,
}

impl Valley {
    pub fn parse(input: &str) -> Result<Self, ValleyError> {
        let rows: Vec<&str> = input.lines().filter(|line| !line.is_empty()).collect();
        let Some((&top, rest)) = rows.split_first() else {
            return Err(ValleyError::TooSmall);
        };
        let Some((&bottom, middle)) = rest.split_last() else {
            return Err(ValleyError::TooSmall);
        };
        if middle.is_empty() || top.len() < 3 {
            return Err(ValleyError::TooSmall);
        }

        let height = middle.len() as i32;
        let width = top.len() as i32 - 2;
        let entry = (-1, gap(top)?);
        let exit = (height, gap(bottom)?);

        let mut blizzards = Vec::new();
        for (row, line) in middle.iter().enumerate() {
            if line.len() != top.len() {
                return Err(ValleyError::RaggedRow((*line).to_owned()));
            }
            for (col, ch) in line.chars().enumerate() {
                let on_wall = col == 0 || col == line.len() - 1;
                let cell = (row as i32, col as i32 - 1);
                match ch {
                    '#' if on_wall => {}
                    _ if on_wall => return Err(ValleyError::UnknownCell(ch)),
                    '.' => {}
                    '>' => blizzards.push((cell, Heading::Right)),
                    '<' => blizzards.push((cell, Heading::Left)),
                    '^' => blizzards.push((cell, Heading::Up)),
                    'v' => blizzards.push((cell, Heading::Down)),
                    other => return Err(ValleyError::UnknownCell(other)),
                }
            }
        }

        Ok(Valley {
            height,
            width,
            entry,
            exit,
            blizzards,
        })
    }

    pub fn entry(&self) -> Cell {
        self.entry
    }

    pub fn exit(&self) -> Cell {
        self.exit
    }

    fn walkable(&self, cell: Cell) -> bool {
        cell == self.entry
            || cell == self.exit
            || ((0..self.height).contains(&cell.0) && (0..self.width).contains(&cell.1))
    }

    /// Where a blizzard ends up after drifting for `minutes`, wrapping at
    /// the walls.
    fn drifted(&self, (row, col): Cell, heading: Heading, minutes: u32) -> Cell {
        let (dr, dc) = heading.delta();
        let m = minutes as i32;
        (
            (row + dr * m).rem_euclid(self.height),
            (col + dc * m).rem_euclid(self.width),
        )
    }
}

fn gap(wall: &str) -> Result<i32, ValleyError> {
    let col = wall
        .chars()
        .position(|ch| ch == '.')
        .ok_or_else(|| ValleyError::MissingGap(wall.to_owned()))?;
    Ok(col as i32 - 1)
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: u32, b: u32) -> u32 {
    a / gcd(a, b) * b
}

/// Blizzard occupancy for every minute of one full cycle. Positions repeat
/// with period lcm(width, height), so one immutable table answers any minute.
#[derive(Debug, Clone)]
pub struct Timeline {
    period: u32,
    occupied: Vec<HashSet<Cell>>,
}

impl Timeline {
    pub fn new(valley: &Valley) -> Self {
        let period = lcm(valley.width as u32, valley.height as u32);
        let occupied = (0..period)
            .map(|minute| {
                valley
                    .blizzards
                    .iter()
                    .map(|&(cell, heading)| valley.drifted(cell, heading, minute))
                    .collect()
            })
            .collect();
        Timeline { period, occupied }
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    fn blocked(&self, minute: u32, cell: Cell) -> bool {
        self.occupied[(minute % self.period) as usize].contains(&cell)
    }
}

/// Fewest minutes to walk from `from` to `to` starting at `start_minute`,
/// or None when the blizzards never leave a way through.
pub fn crossing(
    valley: &Valley,
    timeline: &Timeline,
    from: Cell,
    to: Cell,
    start_minute: u32,
) -> Option<u32> {
    let route = bfs(
        &(from, start_minute % timeline.period),
        |&((row, col), minute)| {
            let minute = (minute + 1) % timeline.period;
            [
                (row, col),
                (row - 1, col),
                (row + 1, col),
                (row, col - 1),
                (row, col + 1),
            ]
            .into_iter()
            .filter(|&cell| valley.walkable(cell) && !timeline.blocked(minute, cell))
            .map(|cell| (cell, minute))
            .collect::<Vec<_>>()
        },
        |&(cell, _)| cell == to,
    )?;
    Some(route.len() as u32 - 1)
}

/// Both answers for a valley input: minutes for the first crossing, then
/// the total after going back for the snacks and crossing once more.
pub fn answers(input: &str) -> Result<(u32, u32), ValleyError> {
    let valley = Valley::parse(input)?;
    let timeline = Timeline::new(&valley);

    let legs = [
        (valley.entry, valley.exit),
        (valley.exit, valley.entry),
        (valley.entry, valley.exit),
    ];
    let mut first = 0;
    let mut elapsed = 0;
    for (leg, (from, to)) in legs.into_iter().enumerate() {
        let took =
            crossing(&valley, &timeline, from, to, elapsed).ok_or(ValleyError::Impassable)?;
        debug!("leg {} took {took} minutes", leg + 1);
        elapsed += took;
        if leg == 0 {
            first = took;
        }
    }
    Ok((first, elapsed))
}
