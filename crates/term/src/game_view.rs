//! GameView: maps a [`SessionSnapshot`] into a terminal framebuffer.
//!
//! Pure (no I/O). The whole viewport shows the 800x600 world, y pointing up, so
//! one column is `800 / width` world units and one row `600 / height`.

use crate::core::{Obstacle, SessionSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{
    GameMode, Phase, BIRD_X, GROUND_HEIGHT, HURT_OBSTACLE_SECS, LEVEL_UP_POINTS, MONKEY_WIDTH,
    OBSTACLE_GAP, OBSTACLE_WIDTH, WORLD_HEIGHT, WORLD_WIDTH,
};

const SKY_TOP: Rgb = Rgb::new(70, 180, 200);
const SKY_BOT: Rgb = Rgb::new(190, 232, 245);
const HURT: Rgb = Rgb::new(220, 60, 60);
const FLASH: Rgb = Rgb::new(255, 250, 210);
const GRASS: Rgb = Rgb::new(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb::new(110, 200, 70);
const DIRT: Rgb = Rgb::new(210, 185, 110);
const DIRT_DARK: Rgb = Rgb::new(185, 160, 90);
const TRUNK_DARK: Rgb = Rgb::new(74, 122, 26);
const TRUNK_LIGHT: Rgb = Rgb::new(145, 215, 62);
const ALT_DARK: Rgb = Rgb::new(110, 70, 40);
const ALT_LIGHT: Rgb = Rgb::new(170, 120, 70);
const CAP: Rgb = Rgb::new(60, 100, 20);
const ALT_CAP: Rgb = Rgb::new(80, 45, 25);
const BODY: Rgb = Rgb::new(25, 25, 30);
const CHEST: Rgb = Rgb::new(255, 225, 100);
const BEAK: Rgb = Rgb::new(240, 110, 50);
const EYE: Rgb = Rgb::new(255, 255, 255);
const MONKEY: Rgb = Rgb::new(120, 75, 40);
const WHITE: Rgb = Rgb::new(255, 255, 255);
const SHADOW: Rgb = Rgb::new(30, 30, 30);
const SELECTED: Rgb = Rgb::new(255, 231, 0);
const GOOD: Rgb = Rgb::new(90, 220, 90);
const PANEL: Rgb = Rgb::new(20, 24, 36);
const HOT_PINK: Rgb = Rgb::new(255, 105, 180);

const HEAD_GLYPHS: [char; 5] = ['█', '▓', '▒', '▙', '▟'];
const ALT_HEAD_GLYPHS: [char; 2] = ['◆', '●'];

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Pause menu page to draw on top of the game.
#[derive(Debug, Clone, Copy)]
pub struct MenuOverlay<'a> {
    pub title: &'a str,
    pub items: &'a [String],
    pub selected: usize,
}

/// World to screen projection for one frame.
#[derive(Debug, Clone, Copy)]
struct Projection {
    w: u16,
    h: u16,
}

impl Projection {
    fn col(&self, wx: f32) -> i32 {
        (wx / WORLD_WIDTH * self.w as f32).floor() as i32
    }

    fn row(&self, wy: f32) -> i32 {
        self.h as i32 - 1 - (wy / WORLD_HEIGHT * self.h as f32).floor() as i32
    }

    /// Screen rows covering world `[y0, y1)`, top row first, clipped.
    fn rows(&self, y0: f32, y1: f32) -> Option<(u16, u16)> {
        if y1 <= y0 {
            return None;
        }
        let top = self.row(y1 - 0.001).max(0);
        let bottom = self.row(y0).min(self.h as i32 - 1);
        (top <= bottom).then_some((top as u16, bottom as u16))
    }

    /// Screen columns covering world `[x0, x1)`, clipped; at least one wide.
    fn cols(&self, x0: f32, x1: f32) -> Option<(u16, u16)> {
        let left = self.col(x0);
        let right = self.col(x1).max(left + 1);
        let left = left.max(0);
        let right = right.min(self.w as i32);
        (left < right).then_some((left as u16, right as u16))
    }

    fn ground_row(&self) -> i32 {
        self.row(GROUND_HEIGHT - 0.001)
    }
}

fn put(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, fg: Rgb) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u16, y as u16);
    let bg = fb.get(x, y).map(|c| c.style.bg).unwrap_or_default();
    fb.put_char(x, y, ch, CellStyle::new(fg, bg));
}

#[derive(Debug, Clone)]
pub struct GameView {
    /// Blank columns between queued characters.
    queue_gap: u16,
}

impl Default for GameView {
    fn default() -> Self {
        Self::new()
    }
}

impl GameView {
    pub fn new() -> Self {
        Self { queue_gap: 3 }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &SessionSnapshot,
        menu: Option<&MenuOverlay<'_>>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));
        if viewport.width < 8 || viewport.height < 6 {
            fb.put_str(0, 0, "TOO SMALL", CellStyle::default());
            return;
        }
        let proj = Projection {
            w: viewport.width,
            h: viewport.height,
        };

        self.draw_sky(fb, snap, proj);
        for obstacle in snap.obstacles.iter() {
            self.draw_obstacle(fb, obstacle, proj);
        }
        self.draw_ground(fb, proj);
        self.draw_monkey(fb, snap, proj);
        self.draw_bird(fb, snap, proj);

        match &snap.passage {
            Some(_) => self.draw_passage(fb, snap, proj),
            None => self.draw_queue(fb, snap, proj),
        }
        self.draw_hud(fb, snap, proj);
        self.draw_banners(fb, snap, proj);

        match snap.phase {
            Phase::NotStarted => self.draw_ready(fb, snap, proj),
            Phase::Paused => {
                if let Some(menu) = menu {
                    self.draw_menu(fb, menu, proj);
                }
            }
            Phase::Victory => self.draw_victory(fb, snap, proj),
            Phase::Playing => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &SessionSnapshot,
        menu: Option<&MenuOverlay<'_>>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, menu, viewport, &mut fb);
        fb
    }

    fn draw_sky(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, proj: Projection) {
        let hurt = (snap.hurt_timer / HURT_OBSTACLE_SECS).clamp(0.0, 1.0) * 0.5;
        let flash = snap.flash_timer.clamp(0.0, 1.0) * 0.4;
        let rows = proj.h.saturating_sub(1).max(1) as f32;
        for y in 0..proj.h {
            let base = SKY_TOP.lerp(SKY_BOT, y as f32 / rows);
            let bg = base.lerp(FLASH, flash).lerp(HURT, hurt);
            fb.fill_rect(0, y, proj.w, 1, ' ', CellStyle::new(WHITE, bg));
        }
    }

    fn draw_ground(&self, fb: &mut FrameBuffer, proj: Projection) {
        let top = proj.ground_row().max(0) as u16;
        for y in top..proj.h {
            for x in 0..proj.w {
                let style = if y == top {
                    let fg = if x % 3 == 0 { GRASS_LIGHT } else { GRASS };
                    CellStyle::new(fg, GRASS)
                } else {
                    CellStyle::new(DIRT_DARK, DIRT)
                };
                let ch = if y == top {
                    '▀'
                } else if (x + y) % 5 == 0 {
                    '·'
                } else {
                    ' '
                };
                fb.put_char(x, y, ch, style);
            }
        }
    }

    fn draw_obstacle(&self, fb: &mut FrameBuffer, o: &Obstacle, proj: Projection) {
        let Some((left, right)) = proj.cols(o.x, o.x + OBSTACLE_WIDTH) else {
            return;
        };
        let (dark, light, cap) = if o.variant {
            (ALT_DARK, ALT_LIGHT, ALT_CAP)
        } else {
            (TRUNK_DARK, TRUNK_LIGHT, CAP)
        };
        let head = if o.variant {
            ALT_HEAD_GLYPHS[o.head_index as usize % ALT_HEAD_GLYPHS.len()]
        } else {
            HEAD_GLYPHS[o.head_index as usize % HEAD_GLYPHS.len()]
        };
        let width = (right - left).max(1) as f32;

        let gap_low = o.gap_center - OBSTACLE_GAP / 2.0;
        let gap_high = o.gap_center + OBSTACLE_GAP / 2.0;
        let segments = [
            (proj.rows(GROUND_HEIGHT, gap_low), true),
            (proj.rows(gap_high, WORLD_HEIGHT), false),
        ];
        for (rows, is_bottom) in segments {
            let Some((top, bottom)) = rows else {
                continue;
            };
            for x in left..right {
                let shade = dark.lerp(light, 1.0 - ((x - left) as f32 / width - 0.35).abs() * 2.0);
                let bg = if o.collided { shade.lerp(SHADOW, 0.4) } else { shade };
                fb.fill_rect(x, top, 1, bottom - top + 1, ' ', CellStyle::new(bg, bg));
            }
            // Head at the gap edge.
            let head_row = if is_bottom { top } else { bottom };
            for x in left..right {
                fb.put_char(x, head_row, head, CellStyle::new(cap, cap.lerp(light, 0.3)).bold());
            }
        }
    }

    fn draw_monkey(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, proj: Projection) {
        let Some((left, right)) = proj.cols(snap.monkey_x, snap.monkey_x + MONKEY_WIDTH) else {
            return;
        };
        let y = proj.ground_row() - 1;
        let art = "(@.@)";
        let len = art.chars().count() as u16;
        let x = left + (right - left).saturating_sub(len) / 2;
        for (i, ch) in art.chars().enumerate() {
            put(fb, (x + i as u16) as i32, y, ch, MONKEY);
        }
    }

    fn draw_bird(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, proj: Projection) {
        let cx = proj.col(snap.bird.x);
        let cy = proj.row(snap.bird.y);
        let body = if snap.hurt_timer > 0.0 {
            BODY.lerp(HURT, 0.6)
        } else {
            BODY
        };

        put(fb, cx - 1, cy - 1, '▄', body);
        put(fb, cx, cy - 1, '▄', body);
        put(fb, cx - 1, cy, '█', body);
        fb_put_styled(fb, cx, cy, '•', CellStyle::new(EYE, body));
        put(fb, cx + 1, cy, '▶', BEAK);
        put(fb, cx + 2, cy, '▸', BEAK);
        put(fb, cx - 1, cy + 1, '▀', body);
        put(fb, cx, cy + 1, '▀', CHEST);

        let wing = if snap.bird.velocity > 0.0 {
            (cy - 1, '╱')
        } else {
            (cy + 1, '╲')
        };
        put(fb, cx - 2, wing.0, wing.1, body);
    }

    fn draw_queue(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, proj: Projection) {
        if snap.queue.is_empty() || snap.phase == Phase::Paused {
            return;
        }
        let y = proj.h / 4;
        let gap = self.queue_gap.max(1);
        let count = snap.queue.len() as u16;
        let total = count + (count - 1) * gap;
        let mut x = proj.w.saturating_sub(total) / 2;

        let backdrop = CellStyle::new(WHITE, PANEL);
        fb.fill_rect(x.saturating_sub(2), y, total + 4, 1, ' ', backdrop);
        for (i, ch) in snap.queue.iter().enumerate() {
            let style = if i == 0 {
                let fg = SELECTED.lerp(GOOD, snap.reward_flash);
                CellStyle::new(fg, PANEL).bold()
            } else {
                backdrop
            };
            fb.put_char(x, y, *ch, style);
            x = x.saturating_add(gap + 1);
        }
        // Head marker.
        let head_x = proj.w.saturating_sub(total) / 2;
        fb.put_char(head_x, y + 1, '▔', CellStyle::new(SELECTED, PANEL));
    }

    fn draw_passage(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, proj: Projection) {
        let Some(passage) = &snap.passage else {
            return;
        };
        if snap.phase == Phase::Paused {
            return;
        }
        let width = passage
            .previous_line
            .chars()
            .count()
            .max(passage.current_line.chars().count())
            .max(passage.next_line.chars().count()) as u16;
        let x = proj.w.saturating_sub(width) / 2;
        let y = proj.h / 5;

        fb.fill_rect(
            x.saturating_sub(2),
            y.saturating_sub(1),
            width + 4,
            5,
            ' ',
            CellStyle::new(WHITE, PANEL),
        );
        let faded = CellStyle::new(Rgb::new(150, 150, 160), PANEL).dim();
        fb.put_str(x, y, &passage.previous_line, faded);

        for (i, ch) in passage.current_line.chars().enumerate() {
            let style = match i.cmp(&passage.local_progress) {
                std::cmp::Ordering::Less => CellStyle::new(GOOD, PANEL),
                std::cmp::Ordering::Equal => CellStyle::new(PANEL, SELECTED).bold(),
                std::cmp::Ordering::Greater => CellStyle::new(WHITE, PANEL),
            };
            let shown = if ch == ' ' && i == passage.local_progress {
                '␣'
            } else {
                ch
            };
            fb.put_char(x + i as u16, y + 1, shown, style);
        }
        fb.put_str(x, y + 2, &passage.next_line, faded);

        if !passage.attribution.is_empty() {
            let text = format!("- {}", passage.attribution);
            let len = text.chars().count() as u16;
            let ax = (x + width).saturating_sub(len);
            fb.put_str(ax, y + 3, &text, CellStyle::new(HOT_PINK, PANEL));
        }
    }

    fn draw_hud(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, proj: Projection) {
        let label = CellStyle::new(WHITE, SHADOW).bold();
        let value = CellStyle::new(SELECTED, SHADOW).bold();

        let x = fb.put_str(1, 0, " HIGH ", label);
        let x = fb.put_u32(x, 0, snap.high_score, value);
        fb.put_char(x, 0, ' ', value);
        let x = fb.put_str(1, 1, " SCORE ", label);
        let x = fb.put_u32(x, 1, snap.score, value);
        fb.put_char(x, 1, ' ', value);

        let right = match snap.mode {
            GameMode::Normal { .. } => format!(" LEVEL {} ", snap.level),
            GameMode::Arcade => format!(" LEVEL {}  STREAK {} ", snap.level, snap.streak),
            _ => format!(" STREAK {}  BEST {} ", snap.streak, snap.max_streak),
        };
        let len = right.chars().count() as u16;
        fb.put_str(proj.w.saturating_sub(len + 1), 0, &right, label);

        // Progression bar, eased.
        if snap.obstacles_enabled {
            let filled = snap.display_progression.round().clamp(0.0, LEVEL_UP_POINTS as f32) as u16;
            let bar_x = proj.w.saturating_sub(LEVEL_UP_POINTS as u16 + 3);
            fb.put_char(bar_x, 1, '[', label);
            for i in 0..LEVEL_UP_POINTS as u16 {
                let (ch, fg) = if i < filled { ('■', GOOD) } else { ('□', WHITE) };
                fb.put_char(bar_x + 1 + i, 1, ch, CellStyle::new(fg, SHADOW));
            }
            fb.put_char(bar_x + 1 + LEVEL_UP_POINTS as u16, 1, ']', label);
        }

        let status = format!(
            " {}  {}{} ",
            snap.difficulty.as_str(),
            snap.progress_label,
            if snap.capitals_enabled { "  Aa" } else { "" }
        );
        fb.put_str(1, proj.h.saturating_sub(1), &status, CellStyle::new(WHITE, SHADOW).dim());
    }

    fn draw_banners(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, proj: Projection) {
        let mid = proj.h / 2;
        if snap.flash_timer > 0.0 {
            let text = if snap.unlock_label == "MAX" {
                "LEVEL UP!  ALL KEYS UNLOCKED".to_string()
            } else {
                format!("LEVEL UP!  NEW KEY {}", snap.unlock_label)
            };
            fb.put_str_centered(mid.saturating_sub(3), &text, CellStyle::new(SELECTED, SHADOW).bold());
        }
        if snap.milestone_timer > 0.0 {
            let pulse = ((snap.state_time * 8.0).sin() * 0.5 + 0.5).clamp(0.0, 1.0);
            let text = if snap.mode.is_streak_mode() {
                format!("{} IN A ROW!", snap.streak)
            } else {
                "MILESTONE!".to_string()
            };
            let fg = HOT_PINK.lerp(SELECTED, pulse);
            fb.put_str_centered(mid.saturating_sub(2), &text, CellStyle::new(fg, SHADOW).bold());
        }
    }

    fn draw_ready(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, proj: Projection) {
        if snap.mode == GameMode::Credits {
            return;
        }
        let mid = proj.h / 2;
        let blink = (snap.state_time * 3.0).sin() > -0.3;
        let prompt = match snap.queue.first() {
            Some(' ') => "TYPE SPACE TO START".to_string(),
            Some(head) => format!("TYPE '{head}' TO START"),
            None => "CLICK TO START".to_string(),
        };
        if blink {
            fb.put_str_centered(mid + 2, &prompt, CellStyle::new(WHITE, SHADOW).bold());
        }
        fb.put_str_centered(
            mid + 3,
            "ESC: MENU   CTRL-C: QUIT",
            CellStyle::new(WHITE, SHADOW).dim(),
        );
    }

    fn draw_box(&self, fb: &mut FrameBuffer, lines: &[(&str, CellStyle)], proj: Projection) {
        let inner = lines
            .iter()
            .map(|(l, _)| l.chars().count() as u16)
            .max()
            .unwrap_or(0)
            + 4;
        let h = lines.len() as u16 + 2;
        let x = proj.w.saturating_sub(inner + 2) / 2;
        let y = proj.h.saturating_sub(h) / 2;
        let frame = CellStyle::new(SELECTED, PANEL);

        fb.fill_rect(x, y, inner + 2, h, ' ', CellStyle::new(WHITE, PANEL));
        fb.put_char(x, y, '╔', frame);
        fb.put_char(x + inner + 1, y, '╗', frame);
        fb.put_char(x, y + h - 1, '╚', frame);
        fb.put_char(x + inner + 1, y + h - 1, '╝', frame);
        for dx in 1..=inner {
            fb.put_char(x + dx, y, '═', frame);
            fb.put_char(x + dx, y + h - 1, '═', frame);
        }
        for (i, (line, style)) in lines.iter().enumerate() {
            let row = y + 1 + i as u16;
            fb.put_char(x, row, '║', frame);
            fb.put_char(x + inner + 1, row, '║', frame);
            let len = line.chars().count() as u16;
            fb.put_str(x + 1 + (inner - len) / 2, row, line, *style);
        }
    }

    fn draw_menu(&self, fb: &mut FrameBuffer, menu: &MenuOverlay<'_>, proj: Projection) {
        let title = CellStyle::new(WHITE, PANEL).bold();
        let normal = CellStyle::new(WHITE, PANEL);
        let selected = CellStyle::new(SELECTED, PANEL).bold();

        let marked: Vec<String> = menu
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if i == menu.selected {
                    format!("> {item} <")
                } else {
                    item.clone()
                }
            })
            .collect();
        let mut lines: Vec<(&str, CellStyle)> = vec![(menu.title, title), ("", normal)];
        for (i, item) in marked.iter().enumerate() {
            lines.push((item.as_str(), if i == menu.selected { selected } else { normal }));
        }
        self.draw_box(fb, &lines, proj);
    }

    fn draw_victory(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, proj: Projection) {
        let reached = format!("LEVEL {} REACHED", snap.level);
        let lines = [
            ("VICTORY!", CellStyle::new(SELECTED, PANEL).bold()),
            ("", CellStyle::new(WHITE, PANEL)),
            (reached.as_str(), CellStyle::new(WHITE, PANEL)),
            ("PRESS ENTER", CellStyle::new(WHITE, PANEL).dim()),
        ];
        self.draw_box(fb, &lines, proj);
    }
}

fn fb_put_styled(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, style: CellStyle) {
    if x >= 0 && y >= 0 {
        fb.put_char(x as u16, y as u16, ch, style);
    }
}

/// Screen column of the bird for a viewport `width` columns wide.
pub fn bird_column(width: u16) -> u16 {
    (BIRD_X / WORLD_WIDTH * width as f32).floor() as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BirdSnapshot;
    use crate::types::READY_Y;

    fn snapshot() -> SessionSnapshot {
        let mut snap = SessionSnapshot::default();
        snap.bird = BirdSnapshot {
            x: BIRD_X,
            y: READY_Y,
            velocity: 0.0,
        };
        snap.queue.push('f');
        snap.queue.push('j');
        snap.queue.push('d');
        snap.progress_label.push_str("3/48");
        snap
    }

    #[test]
    fn test_projection_is_y_up() {
        let proj = Projection { w: 80, h: 30 };
        assert_eq!(proj.row(0.0), 29);
        assert_eq!(proj.row(WORLD_HEIGHT - 1.0), 0);
        assert_eq!(proj.col(WORLD_WIDTH / 2.0), 40);
        assert_eq!(proj.rows(0.0, WORLD_HEIGHT), Some((0, 29)));
        assert_eq!(proj.rows(10.0, 5.0), None);
    }

    #[test]
    fn test_bird_is_drawn_at_its_column() {
        let fb = GameView::new().render(&snapshot(), None, Viewport::new(80, 30));
        let col = bird_column(80);
        let proj = Projection { w: 80, h: 30 };
        let row = proj.row(READY_Y) as u16;
        assert_eq!(fb.get(col + 1, row).map(|c| c.ch), Some('▶'));
    }

    #[test]
    fn test_tiny_viewport_does_not_panic() {
        let fb = GameView::new().render(&snapshot(), None, Viewport::new(3, 2));
        assert_eq!(fb.width(), 3);
    }

    #[test]
    fn test_offscreen_obstacle_is_clipped() {
        let mut snap = snapshot();
        let mut o = Obstacle::default();
        o.init(-300.0, 300.0, true, 1);
        snap.obstacles.push(o);
        let mut o = Obstacle::default();
        o.init(790.0, 300.0, false, 4);
        snap.obstacles.push(o);
        let fb = GameView::new().render(&snap, None, Viewport::new(40, 20));
        assert_eq!(fb.height(), 20);
    }
}
