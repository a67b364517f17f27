use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use web_time::Instant;

use sprig_core::{
    Component, Cursor, ElementKind, NodePath, PassReport, RenderOutcome, Scheduler, ShadowNode,
};

fn kind_label(kind: ElementKind) -> String {
    match kind {
        ElementKind::Text(level) => format!("text:{}", level.tag()),
        other => other.name().to_owned(),
    }
}

fn outline_line(
    out: &mut String,
    depth: usize,
    kind: ElementKind,
    path: &NodePath,
    cursors: &[Cursor],
) {
    let cursors: Vec<String> = cursors.iter().map(Cursor::to_string).collect();
    let _ = writeln!(
        out,
        "{:indent$}{} {} [{}]",
        "",
        kind_label(kind),
        path,
        cursors.join(", "),
        indent = depth * 2
    );
}

/// Outline of a live component tree: `kind path [cursors]` per node.
pub fn dump_tree(root: &Component) -> String {
    fn walk(node: &Component, depth: usize, out: &mut String) {
        outline_line(out, depth, node.kind(), &node.path(), &node.cursors());
        for child in node.children() {
            walk(&child, depth + 1, out);
        }
    }
    let mut out = String::new();
    walk(root, 0, &mut out);
    out
}

/// Same outline as [`dump_tree`], for the renderer's retained copy.
pub fn dump_shadow(root: &ShadowNode) -> String {
    fn walk(node: &ShadowNode, depth: usize, out: &mut String) {
        outline_line(out, depth, node.kind, &node.path, &node.cursors);
        for child in &node.children {
            walk(child, depth + 1, out);
        }
    }
    let mut out = String::new();
    walk(root, 0, &mut out);
    out
}

pub struct Hud {
    pass_count: u64,
    last_pass: Option<Instant>,
    pps_smooth: f32,
    pub metrics: Option<Metrics>,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            pass_count: 0,
            last_pass: None,
            pps_smooth: 0.0,
            metrics: None,
        }
    }

    pub fn pass_count(&self) -> u64 {
        self.pass_count
    }

    /// Smoothed passes per second.
    pub fn passes_per_second(&self) -> f32 {
        self.pps_smooth
    }

    pub fn record(&mut self, report: &PassReport) {
        self.pass_count += 1;
        let now = Instant::now();
        if let Some(prev) = self.last_pass.replace(now) {
            let dt = (now - prev).as_secs_f32();
            if dt > 0.0 {
                let pps = 1.0 / dt;
                // simple EMA
                let a = 0.2;
                self.pps_smooth = if self.pps_smooth == 0.0 {
                    pps
                } else {
                    (1.0 - a) * self.pps_smooth + a * pps
                };
            }
        }
        self.metrics = Some(Metrics {
            build_render_ms: report.elapsed.as_secs_f32() * 1000.0,
            nodes: report.nodes,
            readers: report.readers,
            outcome: report.outcome,
        });
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("pass: {}", self.pass_count),
            format!("pps: {:.1}", self.pps_smooth),
        ];
        if let Some(m) = &self.metrics {
            lines.push(format!("build+render: {:.2} ms", m.build_render_ms));
            lines.push(format!("nodes: {}", m.nodes));
            lines.push(format!("readers: {}", m.readers));
            lines.push(format!("outcome: {:?}", m.outcome));
        }
        lines.join("  |  ")
    }
}

#[derive(Clone, Debug)]
pub struct Metrics {
    pub build_render_ms: f32,
    pub nodes: usize,
    pub readers: usize,
    pub outcome: RenderOutcome,
}

pub struct Inspector {
    pub hud: Hud,
    pub enabled: bool,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    pub fn new() -> Self {
        Self {
            hud: Hud::new(),
            enabled: true,
        }
    }

    /// Creates an inspector fed by every pass of `scheduler`.
    pub fn attach(scheduler: &Scheduler) -> Rc<RefCell<Inspector>> {
        let inspector = Rc::new(RefCell::new(Inspector::new()));
        let weak = Rc::downgrade(&inspector);
        scheduler.on_pass(move |report| {
            if let Some(inspector) = weak.upgrade() {
                inspector.borrow_mut().pass(report);
            }
        });
        inspector
    }

    pub fn pass(&mut self, report: &PassReport) {
        if !self.enabled {
            return;
        }
        self.hud.record(report);
        log::debug!("{}", self.hud.summary());
    }
}
