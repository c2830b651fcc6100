use crate::foundation::core::{Dimensions, Rect};

/// Result of fitting an image over a target rect.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AspectFill {
    /// Where the whole scaled image lands. Always covers the target.
    pub draw: Rect,
    /// Part of the source image (in source pixels) that ends up inside the target.
    pub visible_source: Rect,
}

/// Scale `image` to cover `target`, centering the overflow on the cropped axis.
///
/// Wider images match the target height and overflow horizontally; narrower (or equal)
/// images match the target width and overflow vertically. Degenerate inputs map the target
/// onto itself.
pub fn aspect_fill(target: Rect, image: Dimensions) -> AspectFill {
    let (tw, th) = (target.width(), target.height());
    let img_aspect = image.aspect();
    if img_aspect <= 0.0 || tw <= 0.0 || th <= 0.0 {
        return AspectFill {
            draw: target,
            visible_source: Rect::new(0.0, 0.0, f64::from(image.width), f64::from(image.height)),
        };
    }

    let target_aspect = tw / th;
    let (draw_w, draw_h) = if img_aspect > target_aspect {
        (th * img_aspect, th)
    } else {
        (tw, tw / img_aspect)
    };
    let draw_x = target.x0 - (draw_w - tw) / 2.0;
    let draw_y = target.y0 - (draw_h - th) / 2.0;
    let draw = Rect::new(draw_x, draw_y, draw_x + draw_w, draw_y + draw_h);

    let sx = f64::from(image.width) / draw_w;
    let sy = f64::from(image.height) / draw_h;
    let visible_source = Rect::new(
        (target.x0 - draw.x0) * sx,
        (target.y0 - draw.y0) * sy,
        (target.x1 - draw.x0) * sx,
        (target.y1 - draw.y0) * sy,
    );

    AspectFill {
        draw,
        visible_source,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/crop.rs"]
mod tests;
