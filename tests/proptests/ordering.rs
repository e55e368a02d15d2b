//! Property-Based Tests: Ring Ordering
//!
//! Generates arbitrary message sequences and checks that the ring and the
//! logger hand them back unchanged and in submission order.
//!
//! # Coverage
//!
//! - **Within capacity:** any batch that fits the ring comes back intact
//!   without a consumer running.
//! - **Beyond capacity:** through a running logger, batches larger than the
//!   ring are delivered exactly once, in order.

#[cfg(test)]
mod tests {
    use frag::logging::{LogSink, Logger, RingBuffer, Severity};
    use frag::LoggingConfig;
    use proptest::prelude::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<String>>>);

    impl LogSink for Capture {
        fn write_line(&mut self, line: &str) -> io::Result<()> {
            self.0.lock().unwrap().push(line.to_string());
            Ok(())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn level_strategy() -> impl Strategy<Value = Severity> {
        prop::sample::select(Severity::ALL.to_vec())
    }

    proptest! {
        /// **Property:** a batch no larger than the ring is consumed in the
        /// order it was pushed, with levels intact, and leaves the ring empty.
        #[test]
        fn test_ring_preserves_order_within_capacity(
            capacity in 1usize..64,
            messages in prop::collection::vec(("[a-zA-Z0-9 ]{0,20}", level_strategy()), 0..64),
        ) {
            let (ring, mut cursor) = RingBuffer::new(capacity);
            let batch: Vec<_> = messages.into_iter().take(capacity).collect();

            for (text, level) in &batch {
                prop_assert!(ring.push(*level, text.clone()));
            }
            prop_assert_eq!(ring.len(), batch.len());

            let mut out = Vec::new();
            while let Some((level, text)) = ring.try_consume_next(&mut cursor) {
                out.push((text, level));
            }
            prop_assert_eq!(out, batch);
            prop_assert!(ring.is_empty());
        }

        /// **Property:** through a running logger, any batch reaches the sink
        /// exactly once and in order, whatever the ring size.
        #[test]
        fn test_logger_delivers_batches_in_order(
            capacity in 1usize..8,
            messages in prop::collection::vec("[a-zA-Z0-9 ]{0,20}", 0..40),
        ) {
            let sink = Capture::default();
            let config = LoggingConfig {
                capacity,
                min_level: Severity::Trace,
                color: false,
                ..LoggingConfig::default()
            };
            let logger = Logger::with_sink(&config, Box::new(sink.clone())).unwrap();

            for text in &messages {
                logger.info(format_args!("{}", text));
            }
            logger.shutdown();

            let lines = sink.0.lock().unwrap().clone();
            let bodies: Vec<String> = lines
                .iter()
                .map(|line| {
                    let (_, rest) = line.split_once(" : [INFO] ").unwrap();
                    rest.trim_end_matches('\n').to_string()
                })
                .collect();
            prop_assert_eq!(bodies, messages);
        }
    }
}
