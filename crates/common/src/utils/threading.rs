use crossbeam_channel::unbounded;

use eyre::{eyre, Result};
use std::{any::Any, sync::Arc, thread};

/// A simple thread pool implementation that takes a vector of items, splits them into chunks, and
/// processes each chunk in a separate thread. The results are collected and returned.
///
/// Results are returned in completion order, not input order. If any worker panics, the partial
/// results are discarded and an error carrying the panic message is returned.
///
/// ```
/// use evmaot_common::utils::threading::task_pool;
///
/// let items = vec![1, 2, 3, 4, 5];
/// let num_threads = 2;
/// let mut results = task_pool(items, num_threads, |item| item * 2).expect("a worker panicked");
///
/// // sort
/// results.sort();
///
/// assert_eq!(results, vec![2, 4, 6, 8, 10]);
/// ```
pub fn task_pool<
    T: Clone + Send + Sync + 'static,
    R: Send + 'static,
    F: Fn(T) -> R + Send + Sync + 'static,
>(
    items: Vec<T>,
    num_threads: usize,
    f: F,
) -> Result<Vec<R>> {
    // if items is empty, return empty results
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let (tx, rx) = unbounded();
    let mut handles = Vec::new();

    // Split items into chunks for each thread to process
    let chunk_size = items.len().div_ceil(num_threads.max(1));
    let chunks = items.chunks(chunk_size);

    // Share ownership of f across threads with Arc
    let shared_f = Arc::new(f);

    for chunk in chunks {
        let chunk = chunk.to_owned();
        let tx = tx.clone();
        let shared_f = Arc::clone(&shared_f);
        let handle = thread::spawn(move || {
            let chunk_results: Vec<R> = chunk.into_iter().map(|item| shared_f(item)).collect();
            let _ = tx.send(chunk_results);
        });
        handles.push(handle);
    }

    // only the workers hold senders now, so the receiver drains once they all finish
    drop(tx);
    let results = rx.iter().flatten().collect();

    for handle in handles {
        handle
            .join()
            .map_err(|payload| eyre!("worker thread panicked: {}", panic_message(&*payload)))?;
    }

    Ok(results)
}

/// Extracts the message of a panic payload, if it carries one.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
