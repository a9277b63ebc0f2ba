mod color_wheel;

pub use color_wheel::ColorWheel;
