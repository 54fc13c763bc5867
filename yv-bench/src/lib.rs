//! yv-bench: criterion benchmarks only; no library surface.
