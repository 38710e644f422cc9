//! Candlestick widget drawn with box-drawing glyphs.
//!
//! Each terminal row is split into an upper and a lower half. A candle
//! column picks its glyph from which halves the body and the wick cover,
//! so wicks and bodies get half-row resolution.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Widget};
use stockdash_core::render::{ohlc_bounds, tick_indices, MAX_TICKS};
use stockdash_core::OhlcPoint;

const UP_COLOR: Color = Color::Rgb(0, 184, 148);
const DOWN_COLOR: Color = Color::Rgb(214, 48, 49);
const UNCHANGED_COLOR: Color = Color::Rgb(9, 132, 227);
const AXIS_COLOR: Color = Color::Gray;

/// Columns reserved for price labels.
const AXIS_WIDTH: u16 = 10;
/// `MM-DD HH:MM` plus a gap.
const X_LABEL_WIDTH: u16 = 12;
const MIN_BODY: f64 = 0.5;

pub struct CandlestickChart<'a> {
    points: &'a [OhlcPoint],
    block: Option<Block<'a>>,
}

impl<'a> CandlestickChart<'a> {
    pub fn new(points: &'a [OhlcPoint]) -> Self {
        Self {
            points,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for CandlestickChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if inner.width <= AXIS_WIDTH || inner.height < 2 {
            return;
        }

        let plot = Rect {
            x: inner.x + AXIS_WIDTH,
            y: inner.y,
            width: inner.width - AXIS_WIDTH,
            height: inner.height - 1,
        };
        let visible = &self.points[self.points.len().saturating_sub(plot.width as usize)..];
        let Some((low, high)) = ohlc_bounds(visible) else {
            return;
        };

        let scale = PriceScale {
            low,
            high,
            rows: plot.height,
        };
        render_price_axis(&scale, inner, buf);

        let columns = column_positions(plot.width, visible.len());
        for (point, column) in visible.iter().zip(&columns) {
            let x = plot.x + column;
            let style = Style::default().fg(candle_color(point));
            let wick = (scale.level(point.l), scale.level(point.h));
            let body = thicken(scale.level(point.o.min(point.c)), scale.level(point.o.max(point.c)));

            for row in 0..plot.height {
                let glyph = glyph_for_row(f64::from(row), wick, body);
                if glyph == ' ' {
                    continue;
                }
                let y = plot.bottom() - 1 - row;
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(glyph).set_style(style);
                }
            }
        }

        let label_budget = usize::from(plot.width / X_LABEL_WIDTH).clamp(1, MAX_TICKS);
        let label_row = plot.bottom();
        for index in tick_indices(visible.len(), label_budget) {
            let label = visible[index].x.short_label();
            let width = label.chars().count() as u16;
            let x = (plot.x + columns[index]).min(plot.right().saturating_sub(width));
            buf.set_string(x, label_row, label, Style::default().fg(AXIS_COLOR));
        }
    }
}

struct PriceScale {
    low: f64,
    high: f64,
    rows: u16,
}

impl PriceScale {
    /// Height of `price` in rows above the plot bottom.
    fn level(&self, price: f64) -> f64 {
        let rows = f64::from(self.rows);
        if self.high <= self.low {
            return rows / 2.0;
        }
        (price - self.low) / (self.high - self.low) * rows
    }

    fn price_at(&self, row: u16) -> f64 {
        if self.rows == 0 {
            return self.low;
        }
        self.low + (self.high - self.low) * (f64::from(row) + 0.5) / f64::from(self.rows)
    }
}

fn render_price_axis(scale: &PriceScale, inner: Rect, buf: &mut Buffer) {
    let style = Style::default().fg(AXIS_COLOR);
    let last = scale.rows.saturating_sub(1);
    let mut rows = vec![last, last / 2, 0];
    rows.dedup();

    for row in rows {
        let y = inner.y + last - row;
        let label = format!("{:>width$.2} ", scale.price_at(row), width = usize::from(AXIS_WIDTH) - 2);
        buf.set_stringn(inner.x, y, label, usize::from(AXIS_WIDTH), style);
    }
}

/// Give flat bodies enough height to show up as half a row.
fn thicken(bottom: f64, top: f64) -> (f64, f64) {
    if top - bottom >= MIN_BODY {
        return (bottom, top);
    }
    let center = (bottom + top) / 2.0;
    (center - MIN_BODY / 2.0, center + MIN_BODY / 2.0)
}

fn covers(segment: (f64, f64), from: f64, to: f64) -> bool {
    let overlap = segment.1.min(to) - segment.0.max(from);
    overlap >= (to - from) / 2.0
}

fn glyph_for_row(row: f64, wick: (f64, f64), body: (f64, f64)) -> char {
    let middle = row + 0.5;
    let body_upper = covers(body, middle, row + 1.0);
    let body_lower = covers(body, row, middle);
    let wick_upper = covers(wick, middle, row + 1.0);
    let wick_lower = covers(wick, row, middle);

    match (body_upper, body_lower) {
        (true, true) => '┃',
        (true, false) if wick_lower => '╿',
        (true, false) => '╹',
        (false, true) if wick_upper => '╽',
        (false, true) => '╻',
        (false, false) => match (wick_upper, wick_lower) {
            (true, true) => '│',
            (true, false) => '╵',
            (false, true) => '╷',
            (false, false) => ' ',
        },
    }
}

/// Spread `count` candles across `width` columns; a lone candle is centered.
fn column_positions(width: u16, count: usize) -> Vec<u16> {
    if count == 0 || width == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![width / 2];
    }

    let spacing = f64::from(width) / count as f64;
    (0..count)
        .map(|i| ((i as f64 * spacing).round() as u16).min(width - 1))
        .collect()
}

fn candle_color(point: &OhlcPoint) -> Color {
    if point.c > point.o {
        UP_COLOR
    } else if point.c < point.o {
        DOWN_COLOR
    } else {
        UNCHANGED_COLOR
    }
}

#[cfg(test)]
mod tests {
    use stockdash_core::UtcDateTime;

    use super::*;

    fn point(ts: &str, o: f64, h: f64, l: f64, c: f64) -> OhlcPoint {
        OhlcPoint {
            x: UtcDateTime::parse(ts).expect("timestamp"),
            o,
            h,
            l,
            c,
        }
    }

    fn column(buf: &Buffer, x: u16, rows: std::ops::Range<u16>) -> String {
        rows.map(|y| buf[(x, y)].symbol().to_owned()).collect()
    }

    #[test]
    fn glyphs_follow_half_row_coverage() {
        assert_eq!(glyph_for_row(0.0, (0.0, 1.0), (0.0, 1.0)), '┃');
        assert_eq!(glyph_for_row(0.0, (0.0, 1.0), (0.5, 1.0)), '╿');
        assert_eq!(glyph_for_row(0.0, (0.5, 1.0), (0.5, 1.0)), '╹');
        assert_eq!(glyph_for_row(0.0, (0.0, 1.0), (0.0, 0.5)), '╽');
        assert_eq!(glyph_for_row(0.0, (0.0, 1.0), (2.0, 3.0)), '│');
        assert_eq!(glyph_for_row(0.0, (0.0, 0.2), (2.0, 3.0)), ' ');
    }

    #[test]
    fn lone_candle_is_centered() {
        assert_eq!(column_positions(20, 1), vec![10]);
        assert_eq!(column_positions(10, 5), vec![0, 2, 4, 6, 8]);
        assert!(column_positions(0, 3).is_empty());
    }

    #[test]
    fn full_body_candle_fills_its_column() {
        let points = [point("2025-02-03 09:30:00-05:00", 10.0, 20.0, 10.0, 20.0)];
        let area = Rect::new(0, 0, 30, 6);
        let mut buf = Buffer::empty(area);

        CandlestickChart::new(&points).render(area, &mut buf);

        let x = AXIS_WIDTH + (30 - AXIS_WIDTH) / 2;
        assert_eq!(column(&buf, x, 0..5), "┃┃┃┃┃");
        assert_eq!(buf[(x, 0)].fg, UP_COLOR);
    }

    #[test]
    fn bearish_candle_shows_wicks_above_and_below_the_body() {
        let points = [
            point("2025-02-03 09:30:00-05:00", 10.0, 14.0, 6.0, 10.0),
            point("2025-02-03 09:35:00-05:00", 12.0, 14.0, 6.0, 8.0),
        ];
        let area = Rect::new(0, 0, 20, 9);
        let mut buf = Buffer::empty(area);

        CandlestickChart::new(&points).render(area, &mut buf);

        let x = AXIS_WIDTH + 5;
        let drawn = column(&buf, x, 0..8);
        assert_eq!(drawn, "││┃┃┃┃││");
        assert_eq!(buf[(x, 3)].fg, DOWN_COLOR);
    }

    #[test]
    fn x_axis_uses_short_timestamps() {
        let points = [point("2025-02-03 09:30:00-05:00", 1.0, 2.0, 0.5, 1.5)];
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);

        CandlestickChart::new(&points).render(area, &mut buf);

        let last_row: String = (0..40).map(|x| buf[(x, 5)].symbol().to_owned()).collect();
        assert!(last_row.contains("02-03 14:30"), "axis row was {last_row:?}");
    }
}
