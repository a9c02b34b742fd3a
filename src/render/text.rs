//! Plain-text rendering for terminals and logs

use crate::sim::Level;

/// Draw the level as one character per cell
///
/// Tiles use `#` (wall), `!` (lava) and space; actors are drawn on top at the
/// cell holding their center, the player last.
pub fn render_text(level: &Level) -> String {
    let width = level.width();
    let height = level.height();
    let mut cells: Vec<char> = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| level.grid.get(x, y).glyph())
        .collect();

    let player = level.player_index();
    let order = (0..level.actors.len())
        .filter(|&i| i != player)
        .chain(std::iter::once(player));
    for i in order {
        let actor = &level.actors[i];
        let center = actor.center();
        if center.x < 0.0 || center.y < 0.0 {
            continue;
        }
        let (x, y) = (center.x as usize, center.y as usize);
        if x < width && y < height {
            cells[y * width + x] = actor.glyph();
        }
    }

    let mut out = String::with_capacity((width + 1) * height);
    for row in cells.chunks(width) {
        out.extend(row.iter());
        out.push('\n');
    }
    out
}
