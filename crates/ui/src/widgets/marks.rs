use engine::{RemovalRange, SessionSnapshot};
use iced::widget::canvas::{self, Path, Stroke};
use iced::widget::container;
use iced::{Color, Element, Length, Point, Rectangle, Renderer, Size, Theme, mouse};

/// Converts a timeline tick to an x coordinate in strip space.
///
/// The mapping is proportional across the width, with ticks clamped into
/// `[0, duration]`.
///
/// # Example
///
/// ```ignore
/// assert_eq!(x_from_ticks(0, 10_000_000, 200.0), 0.0);
/// assert_eq!(x_from_ticks(5_000_000, 10_000_000, 200.0), 100.0);
/// ```
pub fn x_from_ticks(ticks: i64, duration_ticks: i64, width: f32) -> f32 {
    if duration_ticks <= 0 || width <= 0.0 {
        return 0.0;
    }

    let clamped = ticks.clamp(0, duration_ticks);
    ((clamped as f64 / duration_ticks as f64) as f32) * width
}

#[derive(Debug)]
struct MarksStrip<'a> {
    duration_ticks: i64,
    ranges: &'a [RemovalRange],
    pending_mark_ticks: Option<i64>,
    cursor_ticks: i64,
    cache: &'a canvas::Cache,
}

impl<Message> canvas::Program<Message> for MarksStrip<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let strip = self.cache.draw(renderer, bounds.size(), |frame| {
            let background = Path::rectangle(Point::ORIGIN, frame.size());
            frame.fill(&background, Color::from_rgb8(22, 24, 29));

            if self.duration_ticks <= 0 {
                return;
            }

            let bar = Path::rectangle(
                Point::new(0.0, 8.0),
                Size::new(bounds.width, (bounds.height - 16.0).max(1.0)),
            );
            frame.fill(&bar, Color::from_rgb8(55, 110, 188));

            for range in self.ranges {
                let x = x_from_ticks(range.start_ticks, self.duration_ticks, bounds.width);
                let end_x = x_from_ticks(range.end_ticks, self.duration_ticks, bounds.width);
                let rect = Path::rectangle(
                    Point::new(x, 8.0),
                    Size::new((end_x - x).max(1.0), (bounds.height - 16.0).max(1.0)),
                );
                frame.fill(&rect, Color::from_rgb8(196, 64, 54));
            }

            if let Some(pending) = self.pending_mark_ticks {
                let x = x_from_ticks(pending, self.duration_ticks, bounds.width);
                let line = Path::line(
                    Point::new(x, 3.0),
                    Point::new(x, (bounds.height - 3.0).max(3.0)),
                );
                frame.stroke(
                    &line,
                    Stroke::default()
                        .with_width(2.0)
                        .with_color(Color::from_rgb8(122, 214, 110)),
                );
            }
        });

        let mut cursor_frame = canvas::Frame::new(renderer, bounds.size());
        if self.duration_ticks > 0 {
            let x = x_from_ticks(self.cursor_ticks, self.duration_ticks, bounds.width);
            let line = Path::line(Point::new(x, 0.0), Point::new(x, bounds.height));
            cursor_frame.stroke(
                &line,
                Stroke::default()
                    .with_width(2.0)
                    .with_color(Color::from_rgb8(235, 235, 235)),
            );
        }

        vec![strip, cursor_frame.into_geometry()]
    }
}

/// Renders the read-only strip of removal ranges over the source duration.
pub fn view<'a, Message>(
    snapshot: Option<&'a SessionSnapshot>,
    cursor_ticks: i64,
    cache: &'a canvas::Cache,
) -> Element<'a, Message>
where
    Message: 'a,
{
    let (ranges, pending_mark_ticks, duration_ticks): (&'a [RemovalRange], Option<i64>, i64) =
        match snapshot {
            Some(snapshot) => (
                snapshot.ranges.as_slice(),
                snapshot.pending_mark_ticks,
                snapshot.duration_ticks,
            ),
            None => (&[], None, 0),
        };

    container(
        canvas::Canvas::new(MarksStrip {
            duration_ticks,
            ranges,
            pending_mark_ticks,
            cursor_ticks,
            cache,
        })
        .width(Length::Fill)
        .height(Length::Fixed(40.0)),
    )
    .width(Length::Fill)
    .into()
}

#[cfg(test)]
mod tests {
    use super::x_from_ticks;

    #[test]
    fn maps_zero_ticks_to_left_edge() {
        assert_eq!(x_from_ticks(0, 10_000_000, 200.0), 0.0);
    }

    #[test]
    fn maps_duration_to_right_edge() {
        assert_eq!(x_from_ticks(10_000_000, 10_000_000, 200.0), 200.0);
    }

    #[test]
    fn maps_midpoint_proportionally() {
        assert_eq!(x_from_ticks(5_000_000, 10_000_000, 200.0), 100.0);
    }

    #[test]
    fn clamps_out_of_range_ticks() {
        assert_eq!(x_from_ticks(-1_000_000, 10_000_000, 200.0), 0.0);
        assert_eq!(x_from_ticks(25_000_000, 10_000_000, 200.0), 200.0);
    }

    #[test]
    fn handles_missing_duration_as_left_edge() {
        assert_eq!(x_from_ticks(1_000, 0, 200.0), 0.0);
    }
}
