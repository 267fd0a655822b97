//! Known Vivado run strategies

pub const DEFAULT_SYNTH_FLOW: &str = "Vivado Synthesis 2021";
pub const DEFAULT_IMPL_FLOW: &str = "Vivado Implementation 2021";

/// Vivado creates this run by default; generated runs replace it
pub const DEFAULT_SYNTH_RUN: &str = "synth_1";

pub const SYNTH_STRATEGIES: &[&str] = &[
    "Vivado Synthesis Defaults",
    "Flow_PerfOptimized_high",
    "Flow_RuntimeOptimized",
    "Flow_AreaOptimized_high",
    "Flow_AreaOptimized_medium",
    "Flow_AlternateRoutability",
    "Flow_PerfThresholdCarry",
    "Flow_AreaMultThresholdDSP",
];

pub const IMPL_STRATEGIES: &[&str] = &[
    "Vivado Implementation Defaults",
    "Performance_Explore",
    "Performance_ExplorePostRoutePhysOpt",
    "Performance_ExtraTimingOpt",
    "Performance_NetDelay_high",
    "Performance_WLBlockPlacement",
    "Performance_Retiming",
    "Congestion_SpreadLogic_high",
    "Congestion_SpreadLogic_medium",
    "Congestion_SpreadLogic_low",
    "Area_Explore",
    "Area_ExploreSequential",
    "Area_ExploreWithRemap",
    "Power_DefaultOpt",
    "Power_ExploreArea",
    "Flow_RunPhysOpt",
    "Flow_RunPostRoutePhysOpt",
    "Flow_RuntimeOptimized",
    "Flow_Quick",
];

pub fn is_known_synth(strategy: &str) -> bool {
    SYNTH_STRATEGIES.contains(&strategy)
}

pub fn is_known_impl(strategy: &str) -> bool {
    IMPL_STRATEGIES.contains(&strategy)
}

/// Closest catalog entry, for "did you mean" hints
pub fn suggest(strategy: &str, catalog: &'static [&'static str]) -> Option<&'static str> {
    catalog
        .iter()
        .map(|known| (*known, strsim::jaro_winkler(strategy, known)))
        .filter(|(_, score)| *score > 0.85)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(known, _)| known)
}
