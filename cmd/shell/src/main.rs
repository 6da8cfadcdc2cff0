//! Interactive pool shell
//!
//! Create, load and inspect up to ten named pools from a prompt.
//! `test` runs a burst against the process-wide pool.

use ringpool::{global, PoolConfig, PoolError, TablePrinter, ThreadPool};
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

const MAX_POOLS: usize = 10;

const HELP: &str = "
Enter a command (type 'exit' to quit):

create pool1 5 100 256  #Create pool 'pool1' with 5 threads, 100 queued tasks, 256k stack
destroy pool1           #Destroy pool 'pool1'
add pool1 10            #Add 10 one-second tasks to 'pool1'
show pool1              #Show state of 'pool1'
test                    #Run the global pool burst test
help                    #Show this help
";

fn sleep_task(n: u32) {
    ringpool::kdebug!("task {} running", n);
    thread::sleep(Duration::from_secs(1));
}

fn test_task(n: u32) {
    println!("Task {} is being processed by {:?}", n, thread::current().name());
    thread::sleep(Duration::from_secs(1));
}

struct Shell {
    pools: Vec<ThreadPool>,
}

impl Shell {
    fn find(&self, name: &str) -> Option<usize> {
        self.pools.iter().position(|p| p.name() == name)
    }

    fn create(&mut self, name: &str, args: &[&str]) {
        if self.pools.len() >= MAX_POOLS {
            println!("Error: Maximum number of pools reached");
            return;
        }
        if self.find(name).is_some() {
            println!("Error: Pool '{}' already exists", name);
            return;
        }
        let num = |i: usize| args.get(i).and_then(|s| s.parse::<u32>().ok());
        let (Some(threads), Some(depth), Some(stack_kb)) = (num(0), num(1), num(2)) else {
            println!("usage: create <name> <threads> <queue> <stack_kb>");
            return;
        };

        let config = PoolConfig::from_env()
            .pool_name(name)
            .max_thread_nums(threads)
            .msg_node_max(depth)
            .thread_stack_size(stack_kb.saturating_mul(1024));
        match ThreadPool::create(config) {
            Ok(pool) => {
                self.pools.push(pool);
                println!("Created thread pool '{}'", name);
            }
            Err(e) => println!("Failed to create thread pool: {}", e),
        }
    }

    fn destroy(&mut self, idx: usize) {
        let pool = self.pools.swap_remove(idx);
        let name = pool.name().to_string();
        match pool.destroy() {
            Ok(()) => println!("Destroyed thread pool '{}'", name),
            Err(e) => println!("Destroy of '{}' failed: {}", name, e),
        }
    }

    fn add(&self, idx: usize, count: u32) {
        let pool = &self.pools[idx];
        for i in 0..count {
            if let Err(e) = pool.add_callback(sleep_task, i) {
                println!("Failed to add task {}: {}", i, e);
                break;
            }
            println!("Added task {} to pool '{}'", i, pool.name());
        }
    }

    fn dispatch(&mut self, line: &str) {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["help"] => print!("{}", HELP),
            ["test"] => run_test(),
            ["create", name, rest @ ..] => self.create(name, rest),
            [cmd @ ("destroy" | "add" | "show"), name, rest @ ..] => {
                let Some(idx) = self.find(name) else {
                    println!("Error: Pool '{}' not found", name);
                    return;
                };
                match *cmd {
                    "destroy" => self.destroy(idx),
                    "add" => {
                        let count = rest.first().and_then(|s| s.parse().ok()).unwrap_or(1);
                        self.add(idx, count);
                    }
                    _ => self.pools[idx].show(&mut TablePrinter::new()),
                }
            }
            _ => print!("{}", HELP),
        }
    }
}

/// Fill the global pool's queue, wait, then stop it.
fn run_test() {
    let config = PoolConfig::from_env()
        .pool_name("shell-test")
        .max_thread_nums(100)
        .msg_node_max(100);
    let depth = config.msg_node_max;

    println!("Starting thread pool burst test...");
    if let Err(e) = global::start(config) {
        println!("Cannot start global pool: {}", e);
        return;
    }

    for i in 0..depth {
        match global::add_callback(test_task, i) {
            Ok(()) => println!("Task {} added successfully", i),
            Err(PoolError::QueueFull) => println!("Task {} rejected: queue full", i),
            Err(e) => println!("Failed to add task {}: {}", i, e),
        }
    }

    for _ in 0..5 {
        println!("Waiting...");
        thread::sleep(Duration::from_secs(1));
    }
    let _ = global::show(&mut TablePrinter::new());

    match global::stop() {
        Ok(()) => println!("Thread pool burst test completed."),
        Err(e) => println!("Global pool stop failed: {}", e),
    }
}

fn main() {
    let mut shell = Shell { pools: Vec::new() };
    println!("Enter a command (type 'exit' to quit):");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                println!("Error reading input: {}. Exiting.", e);
                break;
            }
            None => break,
        };
        if line.trim() == "exit" {
            println!("Exiting program.");
            break;
        }
        shell.dispatch(line.trim());
    }

    for pool in shell.pools.drain(..) {
        let _ = pool.destroy();
    }
}
