use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Widget};

use segregation_core::{Cell, GridSnapshot};

/// Terminal columns used per grid cell, so cells look roughly square.
pub const CELL_WIDTH: u16 = 2;

const TYPE_A_COLOR: Color = Color::Rgb(168, 61, 61);
const TYPE_B_COLOR: Color = Color::Rgb(76, 101, 161);
const EMPTY_COLOR: Color = Color::Rgb(211, 211, 211);

pub struct GridWidget<'a> {
    snapshot: &'a GridSnapshot,
    bordered: bool,
    paused: bool,
}

impl<'a> GridWidget<'a> {
    pub fn new(snapshot: &'a GridSnapshot) -> Self {
        Self {
            snapshot,
            bordered: true,
            paused: false,
        }
    }

    pub fn bordered(mut self, bordered: bool) -> Self {
        self.bordered = bordered;
        self
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    pub fn color_for(cell: Cell) -> Color {
        match cell {
            Cell::TypeA => TYPE_A_COLOR,
            Cell::TypeB => TYPE_B_COLOR,
            Cell::Empty => EMPTY_COLOR,
        }
    }

    pub fn symbol_for(cell: Cell) -> &'static str {
        match cell {
            Cell::Empty => "··",
            Cell::TypeA | Cell::TypeB => "██",
        }
    }

    pub fn title(&self) -> String {
        let counts = self.snapshot.counts;
        let mut title = format!(
            " Step {} | A: {} B: {} Empty: {} ",
            self.snapshot.step, counts.type_a, counts.type_b, counts.empty
        );
        if let Some(report) = self.snapshot.last_step {
            title.push_str(&format!("| unhappy: {} moved: {} ", report.unhappy, report.moved));
        }
        if self.paused {
            title.push_str("[PAUSED] ");
        }
        title
    }

    pub fn get_inner_area(area: Rect, bordered: bool) -> Rect {
        if bordered {
            Block::default().borders(Borders::ALL).inner(area)
        } else {
            area
        }
    }

    /// Whether `area` shows every cell of the snapshot.
    pub fn fits(&self, area: Rect) -> bool {
        let (width, height) = Self::required_size(self.snapshot.size, self.bordered);
        area.width >= width && area.height >= height
    }

    /// Terminal size needed to show the whole grid.
    pub fn required_size(grid_size: usize, bordered: bool) -> (u16, u16) {
        let border = if bordered { 2 } else { 0 };
        let side = u16::try_from(grid_size).unwrap_or(u16::MAX);
        (
            side.saturating_mul(CELL_WIDTH).saturating_add(border),
            side.saturating_add(border),
        )
    }
}

impl<'a> Widget for GridWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.bordered {
            let mut title = self.title();
            if !self.fits(area) {
                title.push_str("[clipped] ");
            }
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .render(area, buf);
        }

        let inner = Self::get_inner_area(area, self.bordered);
        let visible_rows = (inner.height as usize).min(self.snapshot.size);
        let visible_cols = ((inner.width / CELL_WIDTH) as usize).min(self.snapshot.size);

        for (r, row) in self.snapshot.rows().take(visible_rows).enumerate() {
            for (c, &cell) in row.iter().take(visible_cols).enumerate() {
                let x = inner.x + c as u16 * CELL_WIDTH;
                let y = inner.y + r as u16;
                buf.set_string(
                    x,
                    y,
                    Self::symbol_for(cell),
                    Style::default().fg(Self::color_for(cell)),
                );
            }
        }
    }
}
