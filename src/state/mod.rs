mod drawing_state;

pub use drawing_state::{DrawingState, DEFAULT_COLOR, DEFAULT_WIDTH};
