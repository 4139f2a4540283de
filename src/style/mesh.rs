//! Mesh network: seeded node graph with nearest-neighbour edges and
//! glowing hub nodes, skewed toward the right half of the canvas.

use kurbo::Point;

use crate::blur::glow;
use crate::color::Rgba;
use crate::draw;
use crate::error::ThumbsmithResult;
use crate::layer::Layer;
use crate::layout::LayoutRng;
use crate::style::{Fonts, ThumbnailSpec, brand_footer, pill_tag, title_block};
use crate::theme::BrandTheme;

struct Node {
    x: f64,
    y: f64,
    size: f64,
    hub: bool,
}

pub(crate) fn compose(
    spec: &ThumbnailSpec,
    theme: &BrandTheme,
    fonts: &Fonts,
    rng: &mut LayoutRng,
) -> ThumbsmithResult<Layer> {
    let (w, h) = (theme.width, theme.height);
    let (wf, hf) = (f64::from(w), f64::from(h));
    let accent = theme.accent;

    let mut canvas = Layer::filled(w, h, theme.background);

    let mut atmosphere = Layer::transparent(w, h);
    draw::radial_glow(&mut atmosphere, wf * 0.72, hf * 0.45, 460.0, theme.accent_alt, 22);
    canvas.composite_over(&atmosphere)?;

    // nodes cluster right of center so the title column stays calm
    let nodes: Vec<Node> = (0..26)
        .map(|_| {
            let x = wf * (0.38 + 0.62 * rng.range_f64(0.0, 1.0).powf(0.8));
            let y = rng.range_f64(hf * 0.05, hf * 0.95);
            let size = rng.range_f64(2.0, 6.5);
            let hub = rng.chance(0.2);
            Node { x, y, size, hub }
        })
        .collect();

    // each node joins its two nearest neighbours; duplicate pairs simply
    // redraw the same faint edge
    let mut edges = Layer::transparent(w, h);
    for (i, node) in nodes.iter().enumerate() {
        let mut dists: Vec<(usize, f64)> = nodes
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(j, other)| (j, (other.x - node.x).hypot(other.y - node.y)))
            .collect();
        dists.sort_by(|a, b| a.1.total_cmp(&b.1));
        for &(j, dist) in dists.iter().take(2) {
            let alpha = (60.0 * (1.0 - (dist / (wf * 0.35)).min(1.0))).max(8.0) as u8;
            draw::line(
                &mut edges,
                Point::new(node.x, node.y),
                Point::new(nodes[j].x, nodes[j].y),
                1.0,
                accent.with_alpha(alpha),
            );
        }
    }
    canvas.composite_over(&edges)?;

    // node dots; hubs get a bloom pass
    let mut sharp = Layer::transparent(w, h);
    for node in &nodes {
        let alpha = if node.hub { 230 } else { 150 };
        draw::fill_circle(&mut sharp, node.x, node.y, node.size, accent.with_alpha(alpha));
        if node.hub {
            draw::stroke_circle(
                &mut sharp,
                node.x,
                node.y,
                node.size + 6.0,
                1.0,
                accent.with_alpha(70),
            );
        }
    }
    let bloomed = glow(&sharp, 6, 3.0, 1)?;
    canvas.composite_over(&bloomed)?;

    // packet dots travelling along a few edges
    let mut packets = Layer::transparent(w, h);
    for _ in 0..8 {
        let a = &nodes[rng.range_i64(0, nodes.len() as i64 - 1) as usize];
        let b = &nodes[rng.range_i64(0, nodes.len() as i64 - 1) as usize];
        let t = rng.range_f64(0.15, 0.85);
        let x = a.x + (b.x - a.x) * t;
        let y = a.y + (b.y - a.y) * t;
        draw::fill_circle(&mut packets, x, y, 1.6, Rgba::WHITE.with_alpha(160));
    }
    canvas.composite_over(&packets)?;

    draw::vignette_bottom(&mut canvas, hf * 0.38, Rgba::BLACK, 150);

    pill_tag(&mut canvas, theme, fonts, &spec.tag);
    title_block(&mut canvas, theme, fonts, &spec.title, 130.0, 0.0);
    brand_footer(&mut canvas, theme, fonts);

    draw::fill_rect(&mut canvas, 0.0, hf - 3.0, wf, hf, accent.with_alpha(50));

    Ok(canvas)
}
