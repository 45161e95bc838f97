use crate::engine::flood::{Visited, flood_fill};
use crate::model::cell::Colour;
use crate::model::grid::{Grid, HEIGHT, WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedGroup {
    pub colour: Colour,
    pub size: usize,
}

/// Everything that cleared in one scan-and-settle pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainStep {
    pub groups: Vec<ClearedGroup>,
    pub skulls_cleared: usize,
}

impl ChainStep {
    pub fn blocks_cleared(&self) -> usize {
        self.groups.iter().map(|group| group.size).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainReport {
    pub steps: Vec<ChainStep>,
    /// Size of every component met during the first scan, cleared or not.
    pub first_scan: Vec<usize>,
}

impl ChainReport {
    pub fn chain_count(&self) -> u32 {
        self.steps.len() as u32
    }

    pub fn cleared_groups(&self) -> impl Iterator<Item = &ClearedGroup> {
        self.steps.iter().flat_map(|step| step.groups.iter())
    }

    pub fn skulls_cleared(&self) -> usize {
        self.steps.iter().map(|step| step.skulls_cleared).sum()
    }

    /// Truncating mean over groups that cleared, 0 when nothing did.
    pub fn average_cleared_group_size(&self) -> usize {
        let (count, total) = self
            .cleared_groups()
            .fold((0usize, 0usize), |(count, total), group| (count + 1, total + group.size));
        if count == 0 { 0 } else { total / count }
    }

    /// Truncating mean over every first-scan component, 0 on an empty board.
    pub fn average_group_size(&self) -> usize {
        if self.first_scan.is_empty() {
            0
        } else {
            self.first_scan.iter().sum::<usize>() / self.first_scan.len()
        }
    }

    pub fn first_cleared_colour(&self) -> Option<Colour> {
        self.cleared_groups().next().map(|group| group.colour)
    }
}

/// Clears groups until the board is stable.
///
/// Each pass scans left-to-right, top-to-bottom, flood-filling every
/// unvisited coloured cell. All groups that clear in the same pass form one
/// chain step, after which gravity settles the board before the next pass.
pub fn resolve_chains(grid: &mut Grid) -> ChainReport {
    let mut report = ChainReport::default();
    let mut first_pass = true;

    loop {
        let mut visited = Visited::new();
        let mut step = ChainStep::default();

        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if visited.contains(x, y) {
                    continue;
                }
                let Some(component) = flood_fill(grid, x, y, &mut visited) else {
                    continue;
                };
                if first_pass {
                    report.first_scan.push(component.size);
                }
                if component.cleared() {
                    step.groups.push(ClearedGroup {
                        colour: component.colour,
                        size: component.size,
                    });
                    step.skulls_cleared += component.skulls_cleared;
                }
            }
        }
        first_pass = false;

        if step.groups.is_empty() {
            break;
        }
        grid.apply_gravity();
        report.steps.push(step);
    }

    report
}
