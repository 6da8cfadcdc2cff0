//! Stress test - many submitters, one pool
//!
//! Usage: stress [jobs] [submitters]
//!
//! Pool shape comes from `RINGPOOL_*` environment variables. Submitters
//! retry on `QueueFull`, so every job eventually runs.

use ringpool::{env_get, PoolConfig, TablePrinter, ThreadPool};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn main() {
    println!("=== ringpool Stress Test ===\n");

    let mut args = std::env::args().skip(1);
    let num_jobs: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let submitters: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(4).max(1);
    let spin_work: u32 = env_get("STRESS_SPIN", 100);

    let config = PoolConfig::from_env().pool_name("stress");
    config.print();

    let pool = match ThreadPool::create(config) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("create failed: {}", e);
            std::process::exit(1);
        }
    };

    let completed = Arc::new(AtomicU64::new(0));
    let retries = AtomicU64::new(0);
    let start = Instant::now();

    println!("Submitting {} jobs from {} threads...", num_jobs, submitters);
    thread::scope(|s| {
        for t in 0..submitters {
            let pool = &pool;
            let retries = &retries;
            let completed = Arc::clone(&completed);
            let share = num_jobs / submitters + u64::from(t < num_jobs % submitters);
            s.spawn(move || {
                for _ in 0..share {
                    loop {
                        let completed = Arc::clone(&completed);
                        let job = move || {
                            let mut x = 0u64;
                            for i in 0..spin_work {
                                x = x.wrapping_add(std::hint::black_box(i as u64));
                            }
                            std::hint::black_box(x);
                            completed.fetch_add(1, Ordering::Relaxed);
                        };
                        match pool.add_work(job) {
                            Ok(()) => break,
                            Err(e) if e.is_recoverable() => {
                                retries.fetch_add(1, Ordering::Relaxed);
                                thread::yield_now();
                            }
                            Err(e) => {
                                eprintln!("add_work failed: {}", e);
                                return;
                            }
                        }
                    }
                }
            });
        }
    });
    let submit_time = start.elapsed();

    println!("Waiting for completion...");
    let run_start = Instant::now();
    loop {
        let done = completed.load(Ordering::Relaxed);
        if done >= num_jobs {
            break;
        }
        if run_start.elapsed().as_secs() > 30 {
            println!("Timeout! Only {}/{} completed", done, num_jobs);
            break;
        }
        print!("\rCompleted: {}/{}", done, num_jobs);
        thread::sleep(Duration::from_millis(100));
    }
    let total_time = start.elapsed();

    println!("\n\n=== Results ===");
    println!("Jobs:            {}", num_jobs);
    println!("Completed:       {}", completed.load(Ordering::Relaxed));
    println!("QueueFull:       {}", retries.load(Ordering::Relaxed));
    println!("Submit time:     {:?}", submit_time);
    println!("Total time:      {:?}", total_time);
    println!(
        "Throughput:      {:.0} jobs/sec",
        num_jobs as f64 / total_time.as_secs_f64()
    );
    println!();

    pool.show(&mut TablePrinter::new());

    if let Err(e) = pool.destroy() {
        eprintln!("destroy failed: {}", e);
    }
    println!("\n=== Stress Test Complete ===");
}
