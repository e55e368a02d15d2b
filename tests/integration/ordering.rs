//! Integration Tests: Delivery Order
//!
//! Messages must reach the sink in the order their slots were acquired.

#[cfg(test)]
mod tests {
    use crate::common::{bodies, capture_logger};
    use frag::log_info;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_single_producer_order_within_capacity() {
        let (logger, sink) = capture_logger(16);

        for i in 0..16 {
            log_info!(logger, "message {}", i);
        }
        logger.shutdown();

        let expected: Vec<String> = (0..16).map(|i| format!("message {}", i)).collect();
        assert_eq!(bodies(&sink.lines()), expected);
    }

    #[test]
    fn test_single_producer_order_across_many_revolutions() {
        let (logger, sink) = capture_logger(4);

        for i in 0..500 {
            log_info!(logger, "{}", i);
        }
        logger.shutdown();

        let expected: Vec<String> = (0..500).map(|i| i.to_string()).collect();
        assert_eq!(bodies(&sink.lines()), expected);
    }

    #[test]
    fn test_concurrent_producers_keep_per_thread_order() {
        let (logger, sink) = capture_logger(16);
        let logger = Arc::new(logger);

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let logger = Arc::clone(&logger);
                thread::spawn(move || {
                    for i in 0..500 {
                        log_info!(logger, "{}:{}", t, i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        logger.shutdown();

        let lines = bodies(&sink.lines());
        assert_eq!(lines.len(), 2000);

        let mut next: HashMap<usize, usize> = HashMap::new();
        for line in &lines {
            let (t, i) = line.split_once(':').unwrap();
            let t: usize = t.parse().unwrap();
            let i: usize = i.parse().unwrap();
            let expected = next.entry(t).or_insert(0);
            assert_eq!(i, *expected, "thread {} delivered out of order", t);
            *expected += 1;
        }
        assert!(next.values().all(|&n| n == 500));
        assert_eq!(logger.stats().logged, 2000);
        assert_eq!(logger.stats().written, 2000);
    }

    #[test]
    fn test_every_line_is_newline_terminated() {
        let (logger, sink) = capture_logger(8);

        logger.warn(format_args!("a"));
        logger.error(format_args!("b"));
        logger.shutdown();

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert!(line.ends_with('\n'));
            assert_eq!(line.matches('\n').count(), 1);
        }
        assert!(lines[0].contains(" : [WARN] a"));
        assert!(lines[1].contains(" : [ERROR] b"));
    }
}
