use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Shortens text for log lines and error messages.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    truncate_with_suffix(text, max_chars, "...")
}

pub fn truncate_with_suffix(text: &str, max_chars: usize, suffix: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut_at, _)) => format!("{}{}", &text[..cut_at], suffix),
        None => text.to_string(),
    }
}

type Sink = Arc<Mutex<dyn Write + Send>>;

/// Elapsed-seconds ticker on stderr while the terminal waits for the agent.
/// Stdout is left to the reply.
pub struct WorkingStatus {
    label: String,
    start: Instant,
    done: Arc<AtomicBool>,
    sink: Sink,
    handle: Option<thread::JoinHandle<()>>,
    finished: bool,
}

impl WorkingStatus {
    pub fn start(label: impl Into<String>) -> Self {
        Self::start_on(label, Arc::new(Mutex::new(io::stderr())))
    }

    fn start_on(label: impl Into<String>, sink: Sink) -> Self {
        let label = label.into();
        let start = Instant::now();
        let done = Arc::new(AtomicBool::new(false));
        let done_flag = Arc::clone(&done);
        let label_for_thread = label.clone();
        let thread_sink = Arc::clone(&sink);

        let handle = thread::spawn(move || {
            while !done_flag.load(Ordering::Relaxed) {
                let secs = start.elapsed().as_secs();
                write_status(&thread_sink, &format!("\r(working {} {}s)", label_for_thread, secs));
                thread::sleep(Duration::from_millis(250));
            }
        });

        Self {
            label,
            start,
            done,
            sink,
            handle: Some(handle),
            finished: false,
        }
    }

    pub fn finish(mut self) {
        self.stop_thread();
        let secs = self.start.elapsed().as_secs();
        write_status(&self.sink, &format!("\r(done {} {}s)\n", self.label, secs));
        self.finished = true;
    }

    fn stop_thread(&mut self) {
        self.done.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn write_status(sink: &Sink, text: &str) {
    if let Ok(mut out) = sink.lock() {
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

impl Drop for WorkingStatus {
    fn drop(&mut self) {
        if !self.finished {
            self.stop_thread();
            write_status(&self.sink, "\r");
        }
    }
}
