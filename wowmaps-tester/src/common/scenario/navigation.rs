use anyhow::{Result, ensure};
use rand::Rng;

use wowmaps_core::{AppSnapshot, GateOutcome, UnlockSource, View};

use super::{IterationCtx, LogicScenario};

const STEPS: usize = 64;
const MAP_POOL: usize = 6;
const REACHABLE: [View; 6] = [
    View::Home,
    View::List,
    View::Detail,
    View::Search,
    View::Favorite,
    View::Admin,
];

fn random_outcome(ctx: &mut IterationCtx) -> GateOutcome {
    match ctx.rng.gen_range(0..3) {
        0 => GateOutcome::Unlocked(UnlockSource::Countdown),
        1 => GateOutcome::Unlocked(UnlockSource::NativeReward),
        _ => GateOutcome::Cancelled,
    }
}

/// Random walks over navigation, favorites and gate outcomes.
pub struct SnapshotInvariants;

#[async_trait::async_trait(?Send)]
impl LogicScenario for SnapshotInvariants {
    fn name(&self) -> &'static str {
        "Favorite toggles and unlocks keep their invariants"
    }

    async fn run_iteration(&self, ctx: &mut IterationCtx) -> Result<String> {
        let ids: Vec<String> = (0..MAP_POOL).map(|i| format!("map-{i}")).collect();
        let mut snapshot = AppSnapshot::new().navigate(View::Home, None, None);

        for step in 0..STEPS {
            let id = &ids[ctx.rng.gen_range(0..ids.len())];
            snapshot = match ctx.rng.gen_range(0..4) {
                0 => {
                    let view = REACHABLE[ctx.rng.gen_range(0..REACHABLE.len())];
                    let next = snapshot.navigate(view, None, Some(id));
                    let expected_tab = if view.is_tab() {
                        view
                    } else {
                        snapshot.active_tab
                    };
                    ensure!(
                        next.active_tab == expected_tab,
                        "step {step}: {view} left the tab on {}",
                        next.active_tab
                    );
                    ensure!(
                        next.shows_bottom_nav() == view.shows_bottom_nav(),
                        "step {step}: bottom nav wrong on {view}"
                    );
                    ensure!(
                        next.unlocked() == snapshot.unlocked()
                            && next.favorites() == snapshot.favorites(),
                        "step {step}: navigating to {view} changed saved ids"
                    );
                    next
                }
                1 => {
                    let toggled = snapshot.toggle_favorite(id);
                    ensure!(
                        toggled.is_favorite(id) != snapshot.is_favorite(id),
                        "step {step}: toggling {id} kept its membership"
                    );
                    ensure!(
                        toggled.toggle_favorite(id) == snapshot,
                        "step {step}: toggling {id} twice did not restore the snapshot"
                    );
                    toggled
                }
                _ => {
                    let outcome = random_outcome(ctx);
                    let next = snapshot.apply_gate_outcome(id, outcome);
                    ensure!(
                        snapshot.unlocked().is_subset(next.unlocked()),
                        "step {step}: {outcome:?} for {id} re-locked a map"
                    );
                    let unlocked = next.is_unlocked(id);
                    ensure!(
                        unlocked == (outcome.is_unlock() || snapshot.is_unlocked(id)),
                        "step {step}: {outcome:?} for {id} left unlocked={unlocked}"
                    );
                    next
                }
            };
        }

        Ok(format!(
            "{} unlocked, {} favorites after {STEPS} steps",
            snapshot.unlocked().len(),
            snapshot.favorites().len()
        ))
    }
}
