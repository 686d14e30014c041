// This file is an example of how to use the `shape_containment` library.
// The library entry point is `src/lib.rs`.

use shape_containment::{Geometry, Point, Scene, SceneConfig};

fn main() -> anyhow::Result<()> {
    println!("Shape Containment Engine - Example Runner");

    let mut scene = Scene::new(SceneConfig::default())?;
    let shapes = [
        Geometry::Square { center: Point::new(0, 0), side: 300 },
        Geometry::Donut { center: Point::new(0, 0), inner_radius: 20, outer_radius: 40 },
        Geometry::Circle { center: Point::new(0, 0), radius: 5 },
        Geometry::Circle { center: Point::new(30, 0), radius: 5 },
        Geometry::Triangle {
            vertices: [Point::new(200, 200), Point::new(260, 200), Point::new(230, 250)],
        },
    ];

    for geometry in shapes {
        let report = scene.add(geometry)?;
        println!("\n=> {} Id: {} AREA: {:.2}", report.kind, report.id, report.area);
        if !report.inside_of.is_empty() {
            println!("NOTE: This shape is inside of:");
            for container in scene.containers_of(report.id) {
                println!("Shape -> {} (Id:{})", container.kind(), container.id());
            }
        }
    }

    println!("\nTotal surface area of shapes: {:.2}", scene.total_area());

    // Optional first argument: where to save the rendered scene.
    if let Some(path) = std::env::args().nth(1) {
        scene.render().image().save(&path)?;
        println!("Scene written to {path}");
    }
    Ok(())
}
