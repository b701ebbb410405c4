// Example: an auto-paginating feed that asks for the next page near the bottom.
//
// The loader only records the request; the "network" answers on a later tick, as it would
// in a real host.
use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;
use virtual_window::VirtualizerOptions;
use virtual_window_adapter::{InfiniteList, InfiniteOptions, LoadOutcome, LoadTicket};

const PAGE: usize = 20;
const LAST_PAGE: usize = 4;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let requests: Arc<Mutex<Vec<LoadTicket>>> = Arc::default();
    let sink = requests.clone();

    let mut posts: Vec<String> = (0..PAGE).map(|i| format!("post #{i}")).collect();
    let mut feed = InfiniteList::new(
        VirtualizerOptions::new(posts.len(), 120.0).with_overscan(3),
        InfiniteOptions::default().with_has_more(true),
    )
    .expect("valid feed options")
    .with_loader(move |ticket| {
        if let Ok(mut pending) = sink.lock() {
            pending.push(ticket);
        }
    });
    feed.on_resize(700.0);

    let mut page = 1;
    let mut offset: f64 = 0.0;
    for tick in 0..60 {
        offset = (offset + 150.0).min(feed.virtualizer_mut().max_scroll_offset());
        if let Some(ticket) = feed.on_scroll(offset) {
            println!("tick {tick}: requested page {page} ({ticket:?})");
        }
        if let Some(at) = feed.loader_start() {
            println!("tick {tick}: spinner at {at}px");
        }

        // Deliver any pending page one tick after it was requested.
        let delivered: Vec<LoadTicket> = requests
            .lock()
            .map(|mut pending| pending.drain(..).collect())
            .unwrap_or_default();
        for ticket in delivered {
            let start = posts.len();
            posts.extend((start..start + PAGE).map(|i| format!("post #{i}")));
            page += 1;
            let outcome = if page > LAST_PAGE {
                LoadOutcome::Exhausted
            } else {
                LoadOutcome::More
            };
            feed.complete(ticket, outcome, posts.len());
            println!(
                "tick {tick}: page delivered, {} posts, {:?}",
                posts.len(),
                feed.load_state()
            );
        }

        let visible = feed.render(&posts, |post, item| format!("{post} @ {}", item.start));
        if tick % 10 == 0 {
            println!(
                "tick {tick}: offset={offset} showing {:?}..{:?}",
                visible.first(),
                visible.last()
            );
        }
    }
}
