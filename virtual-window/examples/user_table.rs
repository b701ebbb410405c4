// Example: a sortable user table with thousands of fixed-height rows.
//
// Run with `RUST_LOG=virtual_window=trace cargo run --example user_table --features tracing`
// to see the engine's own logs.
use tracing_subscriber::EnvFilter;
use virtual_window::{Align, ScrollHost, Virtualizer, VirtualizerOptions};

struct User {
    id: u32,
    name: String,
    email: String,
}

/// Stand-in for a scrollable `<div>`.
struct Viewport {
    offset: f64,
    extent: f64,
}

impl ScrollHost for Viewport {
    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn viewport_extent(&self) -> f64 {
        self.extent
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        self.offset = offset;
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut users: Vec<User> = (0..5_000)
        .map(|id| User {
            id,
            name: format!("user-{id:04}"),
            email: format!("user{id}@example.com"),
        })
        .collect();

    let mut viewport = Viewport {
        offset: 0.0,
        extent: 500.0,
    };
    let mut v = Virtualizer::new(VirtualizerOptions::table(users.len()));
    v.sync_from_host(&viewport);

    println!("total height: {}px", v.total_size());
    print_rows(&mut v, &users);

    // Jump to the middle of the table, as a "go to row" action would.
    v.scroll_to_index_on(&mut viewport, 2_500, Align::Center);
    v.sync_from_host(&viewport);
    print_rows(&mut v, &users);

    // Sorting replaces the row order but not the row count: the window stays where it is.
    users.sort_by(|a, b| b.name.cmp(&a.name));
    print_rows(&mut v, &users);
}

fn print_rows(v: &mut Virtualizer, users: &[User]) {
    let range = v.virtual_range();
    println!(
        "offset={} rows {}..{} ({} of {} materialized)",
        v.scroll_offset(),
        range.start_index,
        range.end_index,
        range.len(),
        v.count()
    );
    let rows = v.render(users, |user, item| {
        format!(
            "  [{:>4}] translateY({}px) {} <{}> #{}",
            item.index,
            item.start,
            user.name,
            user.email,
            user.id
        )
    });
    for row in rows.iter().take(3) {
        println!("{row}");
    }
    println!("  ...");
}
