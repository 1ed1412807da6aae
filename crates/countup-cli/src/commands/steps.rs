use countup_core::counter::{format_with_spaces, StepPolicy};
use countup_core::AppConfig;

pub fn run(config: &AppConfig) {
    let counter = &config.counter;
    let budget = counter.step_budget();

    println!(
        "Duration {} ms at {} fps, tick every {} ms, step budget {} (policy: {})\n",
        counter.duration_ms,
        counter.fps,
        counter.tick_interval().as_millis(),
        budget,
        policy_name(counter.step_policy),
    );

    for stat in config.page.stat_targets() {
        println!("  {} ({})", stat.label, stat.display());
        for policy in [StepPolicy::Tiered, StepPolicy::Nice] {
            let step = policy.step_for(stat.target, budget);
            let marker = if policy == counter.step_policy { "*" } else { " " };
            println!(
                "   {marker} {:<7} step {:>9}  at most {} values",
                policy_name(policy),
                format_with_spaces(step),
                distinct_values(stat.target, step),
            );
        }
        println!();
    }
}

fn policy_name(policy: StepPolicy) -> &'static str {
    match policy {
        StepPolicy::Tiered => "tiered",
        StepPolicy::Nice => "nice",
    }
}

/// Values a counter can show on the way to `target`, zero and target included
fn distinct_values(target: u64, step: u64) -> u64 {
    if target == 0 {
        return 1;
    }
    target.div_ceil(step.max(1)) + 1
}
