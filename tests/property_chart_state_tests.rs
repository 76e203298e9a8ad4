use proptest::prelude::*;
use streamgraph_rs::api::{
    ChartConfig, ChartSettings, ChartState, ChartType, RenderedState, SettingCommand,
};
use streamgraph_rs::core::Interpolation;

const SERIES: usize = 3;

fn label() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[A-Za-z ]{1,12}"]
}

fn command() -> impl Strategy<Value = SettingCommand> {
    prop_oneof![
        label().prop_map(SettingCommand::SetTitle),
        label().prop_map(SettingCommand::SetSubtitle),
        label().prop_map(SettingCommand::SetXAxisLabel),
        label().prop_map(SettingCommand::SetYAxisLabel),
        any::<bool>().prop_map(SettingCommand::SetLegendVisible),
        any::<bool>().prop_map(SettingCommand::SetGridVisible),
        prop::sample::select(Interpolation::ALL.to_vec()).prop_map(SettingCommand::SetInterpolation),
        prop::sample::select(ChartType::ALL.to_vec()).prop_map(SettingCommand::SetChartType),
        any::<bool>().prop_map(SettingCommand::SetInteractiveGuideline),
        any::<bool>().prop_map(SettingCommand::SetSubscribeFilter),
        (0..SERIES, any::<bool>())
            .prop_map(|(index, disabled)| SettingCommand::SetSeriesDisabled { index, disabled }),
    ]
}

proptest! {
    #[test]
    fn repeating_a_setting_is_a_no_op(
        commands in prop::collection::vec(command(), 0..12),
        last in command(),
    ) {
        let mut state = ChartState::new(ChartConfig::default(), SERIES);
        for command in commands {
            state.apply_setting(command).expect("valid command");
        }
        state.apply_setting(last.clone()).expect("first apply");
        let _ = state.take_pending_invalidation();

        let outcome = state.apply_setting(last).expect("second apply");
        prop_assert!(outcome.is_noop());
        prop_assert!(state.pending_invalidation().is_none());
    }

    #[test]
    fn reconciled_state_matches_a_fresh_render(
        commands in prop::collection::vec(command(), 0..16),
    ) {
        let mut state = ChartState::new(ChartConfig::default(), SERIES);
        for command in commands {
            state.apply_setting(command).expect("valid command");
        }

        prop_assert_eq!(state.rendered(), &RenderedState::derive(state.config()));

        let json = serde_json::to_string(&ChartSettings::new(state.config().clone()))
            .expect("serialize");
        let restored: ChartSettings = serde_json::from_str(&json).expect("deserialize");
        let reopened = ChartState::new(restored.options, SERIES);
        prop_assert_eq!(reopened.rendered(), state.rendered());
        prop_assert_eq!(reopened.margins(), state.margins());
    }
}
