use std::time::Instant;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_MILLIS: u128 = 80;

/// Braille spinner frame for the time elapsed since `since`.
pub fn spinner_frame(since: Instant) -> &'static str {
    let index = (since.elapsed().as_millis() / FRAME_MILLIS) as usize % FRAMES.len();
    FRAMES[index]
}
