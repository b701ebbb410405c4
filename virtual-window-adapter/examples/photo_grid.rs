// Example: a 4-column photo grid with rows measured after their images load.
//
// Run with `RUST_LOG=virtual_window=trace,virtual_window_adapter=debug cargo run --example
// photo_grid --features tracing` to see the engine's own logs.
use tracing_subscriber::EnvFilter;
use virtual_window::Align;
use virtual_window_adapter::{GridOptions, GridVirtualizer};

struct Photo {
    id: u32,
    // Aspect ratio height / width, known only once the image is decoded.
    aspect: f64,
}

const COLUMN_WIDTH: f64 = 240.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let photos: Vec<Photo> = (0..2_002)
        .map(|id| Photo {
            id,
            aspect: 0.5 + f64::from(id % 7) * 0.15,
        })
        .collect();

    let mut grid = GridVirtualizer::new(
        GridOptions::new(photos.len(), 4)
            .with_row_estimate(240.0)
            .with_overscan(2),
    );
    grid.on_resize(900.0);
    println!(
        "{} photos in {} rows, estimated height {}px",
        grid.count(),
        grid.row_count(),
        grid.total_size()
    );

    for _ in 0..2 {
        // A row is as tall as its tallest image.
        for row in grid.virtual_rows() {
            let height = photos[row.items()]
                .iter()
                .map(|p| p.aspect * COLUMN_WIDTH)
                .fold(0.0, f64::max);
            if let Err(err) = grid.record_row_measurement(row.row.index, height) {
                eprintln!("discarded measurement: {err}");
            }
        }
        print_rows(&mut grid, &photos);
        let offset = grid.rows().scroll_offset() + 5_000.0;
        grid.on_scroll(offset);
    }

    // The trailing row holds the last two photos.
    let target = grid.scroll_to_item_offset(photos.len() - 1, Align::End);
    grid.on_scroll(target);
    print_rows(&mut grid, &photos);
}

fn print_rows(grid: &mut GridVirtualizer, photos: &[Photo]) {
    println!(
        "offset={} total={}px",
        grid.rows().scroll_offset(),
        grid.total_size()
    );
    let cells = grid.render(photos, |photo, cell| {
        format!(
            "  row {:>3} col {} at ({}, {}) photo #{}",
            cell.row,
            cell.column,
            cell.column as f64 * COLUMN_WIDTH,
            cell.start,
            photo.id
        )
    });
    for cell in cells.iter().rev().take(4).rev() {
        println!("{cell}");
    }
}
