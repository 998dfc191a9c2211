// controller.rs
// Interactive range state machine behind the range picker.
//
//   Idle ──begin_drag──▶ Dragging ──end_drag──▶ Validated
//   Idle/Validated ──focus_input──▶ Editing ──blur──▶ Validated
//   any ──set_strategy / set_sidedness / significant price move──▶ Idle
//
// Every entry into Idle or Validated re-runs the validator and republishes a
// RangeOutput. Nothing here performs I/O; out-of-domain input is dropped, the
// last committed range is kept, and a NonFiniteInput violation is surfaced
// until the next accepted input.

use serde::{Deserialize, Serialize};

use crate::engine::range_calculator::{compute_default_range, is_significant_price_change};
use crate::engine::snapper::snap_range;
use crate::engine::validator::{validate, RangeLimits};
use crate::error::{ensure_positive_finite, RangeError, RangeResult};
use crate::math::bin_ladder::{boundary_bin_ids, price_per_lamport, price_to_bin_id, BinStep};
use crate::models::{
    PoolSnapshot, PriceRange, RangeOutput, Sidedness, Strategy, TokenDecimals,
    ValidationReport, Violation,
};

/// One on-chain position covers at most this many bins.
pub const MAX_BINS_PER_POSITION: u32 = 70;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerState {
    Idle,
    Dragging,
    Editing,
    Validated,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Min,
    Max,
}

/// What an active-price update did to the controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PriceUpdate {
    Ignored,
    Stored,
    Rederived,
}

/// Validated range handed to the transaction builder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSubmission {
    pub min_price: f64,
    pub max_price: f64,
    pub bin_count: u32,
    /// Relative to the active bin, or absolute when the pool supplied its active bin id.
    pub lower_bin_id: i32,
    pub upper_bin_id: i32,
    pub positions_required: u32,
    pub strategy: Strategy,
    pub sidedness: Sidedness,
    pub min_price_per_lamport: Option<f64>,
    pub max_price_per_lamport: Option<f64>,
}

pub struct RangeController {
    limits: RangeLimits,
    step: BinStep,
    active_price: f64,
    // price the committed range was last derived or snapped against
    reference_price: f64,
    // absolute pool bin sitting at `reference_price`, when the pool reported one
    reference_bin_id: Option<i32>,
    active_bin_id: Option<i32>,
    decimals: Option<TokenDecimals>,
    strategy: Strategy,
    sidedness: Sidedness,
    state: ControllerState,
    committed: PriceRange,
    live: PriceRange,
    handle: Option<Handle>,
    input_violation: Option<Violation>,
    report: ValidationReport,
    published: RangeOutput,
}

impl RangeController {
    pub fn new(
        pool: &PoolSnapshot,
        strategy: Strategy,
        sidedness: Sidedness,
        limits: RangeLimits,
    ) -> RangeResult<Self> {
        let step = BinStep::new(pool.bin_step_bps)?;
        let active_price = ensure_positive_finite("active price", pool.active_price)?;
        let committed = compute_default_range(active_price, step, strategy, sidedness)?;
        let report = validate(&committed, active_price, step, sidedness, &limits);
        let published = RangeOutput::from_report(committed, &report);

        log::debug!(
            "range controller created: price={} step={}bps strategy={:?} sidedness={:?} bins={}",
            active_price, step.bps(), strategy, sidedness, report.bin_count
        );

        Ok(Self {
            limits,
            step,
            active_price,
            reference_price: active_price,
            reference_bin_id: pool.active_bin_id,
            active_bin_id: pool.active_bin_id,
            decimals: pool.decimals,
            strategy,
            sidedness,
            state: ControllerState::Idle,
            committed,
            live: committed,
            handle: None,
            input_violation: None,
            report,
            published,
        })
    }

    // ------------------------------- Accessors --------------------------------

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn range(&self) -> PriceRange {
        self.committed
    }

    /// Unsnapped values while dragging or editing; the committed range otherwise.
    pub fn live_range(&self) -> PriceRange {
        self.live
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn output(&self) -> &RangeOutput {
        &self.published
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn sidedness(&self) -> Sidedness {
        self.sidedness
    }

    pub fn active_price(&self) -> f64 {
        self.active_price
    }

    pub fn bin_step(&self) -> BinStep {
        self.step
    }

    // ------------------------------- Drag flow --------------------------------

    pub fn begin_drag(&mut self, handle: Handle) -> bool {
        if !self.accepts_interaction() {
            return false;
        }
        self.start_interaction(ControllerState::Dragging, handle);
        true
    }

    pub fn drag_to(&mut self, price: f64) -> bool {
        self.state == ControllerState::Dragging && self.set_live(price)
    }

    pub fn end_drag(&mut self) -> bool {
        if self.state != ControllerState::Dragging {
            return false;
        }
        self.commit_live();
        true
    }

    // ------------------------------- Input flow -------------------------------

    pub fn focus_input(&mut self, handle: Handle) -> bool {
        if !self.accepts_interaction() {
            return false;
        }
        self.start_interaction(ControllerState::Editing, handle);
        true
    }

    pub fn edit_input(&mut self, price: f64) -> bool {
        self.state == ControllerState::Editing && self.set_live(price)
    }

    pub fn blur(&mut self) -> bool {
        if self.state != ControllerState::Editing {
            return false;
        }
        self.commit_live();
        true
    }

    // ----------------------------- Preset changes -----------------------------

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
        self.reset_to_default();
    }

    pub fn set_sidedness(&mut self, sidedness: Sidedness) {
        self.sidedness = sidedness;
        self.reset_to_default();
    }

    /// Feed a new active price from the pool-state collaborator.
    ///
    /// A move larger than the significance threshold (measured against the price
    /// the current range was built on) re-derives the default range while the user
    /// is not interacting. Smaller moves keep the user's range and only revalidate.
    pub fn update_active_price(&mut self, price: f64) -> PriceUpdate {
        let active_bin_id = self.bin_on_reference_ladder(price);
        self.apply_price(price, active_bin_id)
    }

    /// Same as [`update_active_price`](Self::update_active_price), taking the
    /// pool's own active bin id when the snapshot carries one.
    pub fn update_pool(&mut self, pool: &PoolSnapshot) -> PriceUpdate {
        if pool.bin_step_bps != self.step.bps() {
            log::warn!(
                "ignoring pool update with bin step {}bps, controller uses {}bps",
                pool.bin_step_bps,
                self.step.bps()
            );
            return PriceUpdate::Ignored;
        }
        let active_bin_id = pool
            .active_bin_id
            .or_else(|| self.bin_on_reference_ladder(pool.active_price));
        self.apply_price(pool.active_price, active_bin_id)
    }

    fn apply_price(&mut self, price: f64, active_bin_id: Option<i32>) -> PriceUpdate {
        if let Err(err) = ensure_positive_finite("active price", price) {
            log::warn!("ignoring active price update: {}", err);
            return PriceUpdate::Ignored;
        }
        self.active_bin_id = active_bin_id;

        let significant = is_significant_price_change(
            self.reference_price,
            price,
            self.limits.significant_price_change,
        );
        self.active_price = price;

        match self.state {
            ControllerState::Dragging | ControllerState::Editing => PriceUpdate::Stored,
            ControllerState::Idle | ControllerState::Validated if significant => {
                log::debug!(
                    "active price moved {} -> {}; re-deriving default range",
                    self.reference_price, price
                );
                self.reset_to_default();
                PriceUpdate::Rederived
            }
            ControllerState::Idle | ControllerState::Validated => {
                self.revalidate();
                PriceUpdate::Stored
            }
        }
    }

    // ------------------------------- Submission -------------------------------

    /// Re-run validation and build the hand-off for the transaction builder.
    pub fn submission(&self) -> RangeResult<RangeSubmission> {
        let report = self.fresh_report();
        if !report.can_submit() {
            let kinds = report.blocking_kinds();
            log::warn!("submission blocked: {:?}", kinds);
            return Err(RangeError::SubmissionBlocked(kinds));
        }

        // ids on the ladder the range was snapped to, not the drifted active price
        let (lower, upper) = boundary_bin_ids(&self.committed, self.reference_price, self.step)?;
        let (lower_bin_id, upper_bin_id) = match self.reference_bin_id {
            Some(reference) => (offset_bin(reference, lower)?, offset_bin(reference, upper)?),
            None => {
                let active = price_to_bin_id(self.active_price, self.reference_price, self.step)?;
                let from_active = |id: i32| {
                    id.checked_sub(active)
                        .ok_or(RangeError::BinIdOverflow(id as f64 - active as f64))
                };
                (from_active(lower)?, from_active(upper)?)
            }
        };
        let lamports = |price: f64| {
            self.decimals.map(|d| price_per_lamport(price, d.base, d.quote))
        };

        Ok(RangeSubmission {
            min_price: self.committed.min_price,
            max_price: self.committed.max_price,
            bin_count: report.bin_count,
            lower_bin_id,
            upper_bin_id,
            positions_required: report.bin_count.div_ceil(MAX_BINS_PER_POSITION),
            strategy: self.strategy,
            sidedness: self.sidedness,
            min_price_per_lamport: lamports(self.committed.min_price),
            max_price_per_lamport: lamports(self.committed.max_price),
        })
    }

    // -------------------------------- Internals -------------------------------

    fn accepts_interaction(&self) -> bool {
        matches!(self.state, ControllerState::Idle | ControllerState::Validated)
    }

    fn start_interaction(&mut self, next: ControllerState, handle: Handle) {
        log::debug!("{:?} -> {:?} on {:?} handle", self.state, next, handle);
        self.state = next;
        self.handle = Some(handle);
        self.live = self.committed;
    }

    fn set_live(&mut self, price: f64) -> bool {
        if let Err(err) = ensure_positive_finite("entered price", price) {
            log::warn!("rejected range input: {}", err);
            self.input_violation = Some(Violation::from(&err));
            self.revalidate();
            return false;
        }
        self.input_violation = None;
        match self.handle {
            Some(Handle::Min) => self.live.min_price = price,
            Some(Handle::Max) => self.live.max_price = price,
            None => return false,
        }
        true
    }

    fn commit_live(&mut self) {
        match snap_range(&self.live, self.active_price, self.step, self.sidedness) {
            Ok(snapped) => {
                self.committed = snapped;
                self.rebase_reference();
            }
            Err(err) => {
                log::warn!("keeping last valid range, snap failed: {}", err);
                self.input_violation = Some(Violation::from(&err));
            }
        }
        log::debug!("{:?} -> Validated", self.state);
        self.live = self.committed;
        self.handle = None;
        self.state = ControllerState::Validated;
        self.revalidate();
    }

    fn reset_to_default(&mut self) {
        match compute_default_range(self.active_price, self.step, self.strategy, self.sidedness) {
            Ok(range) => {
                self.committed = range;
                self.rebase_reference();
                self.input_violation = None;
            }
            Err(err) => {
                log::warn!("keeping last valid range, default derivation failed: {}", err);
                self.input_violation = Some(Violation::from(&err));
            }
        }
        log::debug!(
            "{:?} -> Idle with {:?}/{:?} default",
            self.state, self.strategy, self.sidedness
        );
        self.live = self.committed;
        self.handle = None;
        self.state = ControllerState::Idle;
        self.revalidate();
    }

    fn rebase_reference(&mut self) {
        self.reference_price = self.active_price;
        self.reference_bin_id = self.active_bin_id;
    }

    /// Absolute bin the price falls in, counted from the reference bin.
    fn bin_on_reference_ladder(&self, price: f64) -> Option<i32> {
        let reference = self.reference_bin_id?;
        let relative = price_to_bin_id(price, self.reference_price, self.step).ok()?;
        offset_bin(reference, relative).ok()
    }

    fn fresh_report(&self) -> ValidationReport {
        let mut report = validate(
            &self.committed,
            self.active_price,
            self.step,
            self.sidedness,
            &self.limits,
        );
        if let Some(v) = &self.input_violation {
            report.violations.push(v.clone());
        }
        report
    }

    fn revalidate(&mut self) {
        self.report = self.fresh_report();
        self.published = RangeOutput::from_report(self.committed, &self.report);
    }
}

fn offset_bin(active_bin_id: i32, relative: i32) -> RangeResult<i32> {
    active_bin_id
        .checked_add(relative)
        .ok_or(RangeError::BinIdOverflow(active_bin_id as f64 + relative as f64))
}
