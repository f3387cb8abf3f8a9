use std::collections::HashSet;

use tracing::{debug, info, trace};

use crate::collector::{collect_all, Collector, TaskView};
use crate::common_types::{TaskId, Tick};
use crate::config::SchedulerConfig;
use crate::error::{Result, SchedError};
use crate::quantum::QuantumSource;
use crate::scheduler::{
    RunOutcome, RunSummary, Scheduler, SchedulerState, SchedulingDecision, TickReport,
};
use crate::schedulers::{FairTask, TaskState};
use crate::tree::TaskTree;

pub struct FairScheduler<Q: QuantumSource> {
    ready: TaskTree,
    finished: Vec<FairTask>,
    known: HashSet<TaskId>,
    quantum: Q,
    config: SchedulerConfig,
    state: SchedulerState,
    tick: Tick,
    next_id: TaskId,
    total_granted: f64,
}

impl<Q: QuantumSource> FairScheduler<Q> {
    pub fn new(quantum: Q, config: SchedulerConfig) -> Result<FairScheduler<Q>> {
        config.validate()?;

        Ok(FairScheduler {
            ready: TaskTree::new(),
            finished: Vec::new(),
            known: HashSet::new(),
            quantum,
            config,
            state: SchedulerState::Idle,
            tick: Tick::new(0),
            next_id: TaskId::new(1),
            total_granted: 0.0,
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn tick(&self) -> u64 {
        self.tick.get()
    }

    pub fn is_done(&self) -> bool {
        self.state == SchedulerState::Done
    }

    pub fn total_granted(&self) -> f64 {
        self.total_granted
    }

    /// The runnable tasks, read-only
    pub fn ready(&self) -> &TaskTree {
        &self.ready
    }

    pub fn finished(&self) -> &[FairTask] {
        &self.finished
    }

    /// Creates a task with the next free id at the configured baseline
    /// vruntime and makes it runnable
    ///
    /// * `nice` - priority hint, 0 is the default priority
    /// * `work` - execution time the task needs before it finishes
    pub fn spawn(&mut self, nice: i32, work: f64) -> Result<TaskId> {
        let id = self.next_id;
        let task = FairTask::new(id, nice, self.config.base_vruntime, work)?;
        self.enqueue(task)?;

        Ok(id)
    }

    /// Makes a task created elsewhere runnable. Ids must be unique over the
    /// lifetime of the scheduler and leave room for the next spawned id.
    pub fn enqueue(&mut self, mut task: FairTask) -> Result<()> {
        let id = task.id();
        let Some(following) = id.get().checked_add(1) else {
            return Err(SchedError::InvalidTaskParameter {
                field: "id",
                reason: format!("{id} leaves no room for further ids"),
            });
        };

        if self.known.contains(&id) {
            return Err(SchedError::InvalidTaskParameter {
                field: "id",
                reason: format!("{id} is already known to the scheduler"),
            });
        }
        self.known.insert(id);

        if following > self.next_id.get() {
            self.next_id = TaskId::new(following);
        }

        debug!(
            task = %id,
            nice = task.nice(),
            weight = task.weight(),
            vruntime = %task.vruntime(),
            "task enqueued"
        );
        task.set_state(TaskState::Ready);
        self.ready.insert(task);

        if self.state == SchedulerState::Done {
            self.state = SchedulerState::Idle;
        }

        Ok(())
    }

    fn set_state(&mut self, state: SchedulerState) {
        trace!(from = ?self.state, to = ?state, tick = self.tick.get(), "state transition");
        self.state = state;
    }

    fn draw_quantum(&mut self) -> f64 {
        // NaN.max(floor) is the floor
        self.quantum.draw().max(self.config.min_quantum)
    }

    /// Ticks until the tree is empty or the configured tick limit is hit
    pub fn run(&mut self) -> RunSummary {
        self.run_with(|_, _| {})
    }

    /// Like [`FairScheduler::run`], handing every tick report and the task
    /// tree as it stands after the tick to `observe`
    pub fn run_with<F: FnMut(&TickReport, &TaskTree)>(&mut self, mut observe: F) -> RunSummary {
        info!(
            tasks = self.ready.len(),
            max_ticks = ?self.config.max_ticks,
            "scheduling run started"
        );

        let outcome = loop {
            if let Some(limit) = self.config.max_ticks {
                if self.tick.get() >= limit && !self.ready.is_empty() {
                    break RunOutcome::TickLimitReached;
                }
            }

            match self.next() {
                SchedulingDecision::Run(report) => observe(&report, &self.ready),
                SchedulingDecision::Done => break RunOutcome::Completed,
            }
        };

        info!(
            outcome = ?outcome,
            ticks = self.tick.get(),
            finished = self.finished.len(),
            runnable = self.ready.len(),
            "scheduling run stopped"
        );

        RunSummary {
            outcome,
            ticks: self.tick.get(),
            total_granted: self.total_granted,
            finished: self.collect_finished(),
        }
    }
}

impl<Q: QuantumSource> Collector for FairScheduler<Q> {
    /// A tick runs to completion inside [`Scheduler::next`], so no task is
    /// ever observed running from outside.
    fn collect_running(&self) -> Vec<TaskView> {
        Vec::new()
    }

    fn collect_ready(&self) -> Vec<TaskView> {
        self.ready
            .iter()
            .map(|view| TaskView::new(view.task, Some(view.color)))
            .collect()
    }

    fn collect_finished(&self) -> Vec<TaskView> {
        self.finished
            .iter()
            .map(|task| TaskView::new(task, None))
            .collect()
    }
}

impl<Q: QuantumSource> Scheduler for FairScheduler<Q> {
    fn next(&mut self) -> SchedulingDecision {
        if self.is_done() {
            return SchedulingDecision::Done;
        }

        self.set_state(SchedulerState::Dispatching);

        let mut task = match self.ready.extract_minimum() {
            Ok(task) => task,
            Err(err) => {
                debug!(%err, tick = self.tick.get(), "nothing left to dispatch");
                self.set_state(SchedulerState::Done);
                return SchedulingDecision::Done;
            }
        };

        self.set_state(SchedulerState::Running);
        task.set_running();

        let quantum = self.draw_quantum();
        let granted = task.charge(quantum);
        self.total_granted += granted;
        self.tick = self.tick + 1;

        let report = TickReport {
            tick: self.tick.get(),
            task: task.id(),
            quantum: granted,
            remaining: task.remaining_work(),
            vruntime: task.vruntime().get(),
            dealt_exec: task.dealt_exec(),
            finished: task.is_finished(),
        };

        debug!(
            tick = report.tick,
            task = %report.task,
            quantum = report.quantum,
            vruntime = report.vruntime,
            remaining = report.remaining,
            "task dispatched"
        );

        if task.is_finished() {
            debug!(task = %task.id(), dealt_exec = task.dealt_exec(), "task finished");
            self.finished.push(task);
        } else {
            self.set_state(SchedulerState::Requeuing);
            task.set_state(TaskState::Ready);
            self.ready.insert(task);
        }

        self.set_state(SchedulerState::Idle);

        SchedulingDecision::Run(report)
    }

    fn list(&self) -> Vec<TaskView> {
        collect_all(self)
    }
}
