use console_engine::pixel;
use console_engine::screen::Screen;
use console_engine::Color;

use crate::environment::road::car::Car;
use crate::environment::road::collision_field::CollisionField;

/// Renders a downscaled top view of the road and the car into a console screen.
///
/// Each console cell covers a block of field pixels and shows the class of the block's center pixel.
pub struct ConsoleDrawer {
    columns: u32,
    rows: u32,
}

impl ConsoleDrawer {
    pub fn new(
        columns: u32,
        rows: u32,
    ) -> Self {
        assert!(columns > 0 && rows > 0);
        Self { columns, rows }
    }

    pub fn draw(
        &self,
        field: &CollisionField,
        car: &Car,
    ) -> Screen {
        let mut screen = Screen::new_fill(self.columns, self.rows, pixel::pxl(' '));
        let cell_width = field.width() as f32 / self.columns as f32;
        let cell_height = field.height() as f32 / self.rows as f32;

        for row in 0..self.rows {
            for column in 0..self.columns {
                let x = (column as f32 + 0.5) * cell_width;
                let y = (row as f32 + 0.5) * cell_height;
                if field.is_wall(x, y) {
                    screen.set_pxl(column as i32, row as i32, pixel::pxl('░'));
                }
            }
        }

        let position = car.position();
        let column = (position.x / cell_width).floor() as i32;
        let row = (position.y / cell_height).floor() as i32;
        if (0..self.columns as i32).contains(&column) && (0..self.rows as i32).contains(&row) {
            screen.set_pxl(column, row, pixel::pxl_fg(heading_glyph(car.heading()), Color::Yellow));
        }
        screen
    }
}

/// arrow for the nearest of the eight compass directions
pub fn heading_glyph(heading: f32) -> char {
    const GLYPHS: [char; 8] = ['→', '↗', '↑', '↖', '←', '↙', '↓', '↘'];
    let sector = ((heading.rem_euclid(360.0) + 22.5) / 45.0) as usize % 8;
    GLYPHS[sector]
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use nalgebra::Point2;
    use rstest::rstest;

    use crate::environment::road::collision_field::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH, WALL_COLOR};

    use super::*;

    #[rstest]
    #[case(0.0, '→')]
    #[case(20.0, '→')]
    #[case(30.0, '↗')]
    #[case(90.0, '↑')]
    #[case(180.0, '←')]
    #[case(270.0, '↓')]
    #[case(355.0, '→')]
    fn test_heading_glyph(
        #[case] heading: f32,
        #[case] glyph: char,
    ) {
        assert_eq!(heading_glyph(heading), glyph);
    }

    #[test]
    fn test_draw_marks_walls_and_car() {
        // upper half wall, lower half road
        let image = RgbaImage::from_fn(VIEWPORT_WIDTH, VIEWPORT_HEIGHT, |_, y| {
            if y < VIEWPORT_HEIGHT / 2 { WALL_COLOR } else { Rgba([0, 0, 0, 255]) }
        });
        let field = CollisionField::from_image(&image).unwrap();
        let car = Car::new(Point2::new(400.0, 450.0), 90.0);

        let screen = ConsoleDrawer::new(80, 30).draw(&field, &car);

        assert_eq!(screen.get_pxl(0, 0).unwrap().chr, '░');
        assert_eq!(screen.get_pxl(0, 29).unwrap().chr, ' ');
        assert_eq!(screen.get_pxl(40, 22).unwrap().chr, '↑');
        let unset_cells = (0..30)
            .flat_map(|y| (0..80).map(move |x| (x, y)))
            .filter(|&(x, y)| screen.get_pxl(x, y).unwrap().chr == '\0')
            .count();
        assert_eq!(unset_cells, 0);
    }
}
