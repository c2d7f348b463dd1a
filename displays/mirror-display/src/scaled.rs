//! Integer-scaled view of a draw target

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Draws every incoming pixel as a `scale`×`scale` block at `origin`
pub struct Scaled<'a, T> {
    parent: &'a mut T,
    origin: Point,
    scale: u32,
}

impl<'a, T> Scaled<'a, T> {
    pub fn new(parent: &'a mut T, origin: Point, scale: u32) -> Self {
        Self {
            parent,
            origin,
            scale: scale.max(1),
        }
    }
}

impl<T: DrawTarget> Dimensions for Scaled<'_, T> {
    fn bounding_box(&self) -> Rectangle {
        let parent = self.parent.bounding_box();
        Rectangle::new(Point::zero(), parent.size / self.scale)
    }
}

impl<T: DrawTarget> DrawTarget for Scaled<'_, T> {
    type Color = T::Color;
    type Error = T::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let block = Size::new(self.scale, self.scale);
        for Pixel(point, color) in pixels {
            let top_left = self.origin + point * self.scale as i32;
            self.parent.fill_solid(&Rectangle::new(top_left, block), color)?;
        }
        Ok(())
    }
}
