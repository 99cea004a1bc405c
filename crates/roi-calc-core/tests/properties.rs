use proptest::prelude::*;
use roi_calc_core::{
    calculate_roi, improved_closing_rate, CalculationInput, Market, RoiCalculator,
};

prop_compose! {
    fn valid_input()(
        team_size in 1.0..500.0f64,
        hours_per_day in 0.5..=24.0f64,
        hourly_cost in 1.0..500.0f64,
        leads_per_month in 1.0..10_000.0f64,
        customer_lifetime_value in 1.0..100_000.0f64,
        current_closing_rate in 0.0..=100.0f64,
        agree_with_20_percent_increase in any::<bool>(),
    ) -> CalculationInput {
        CalculationInput {
            team_size,
            hours_per_day,
            hourly_cost,
            leads_per_month,
            customer_lifetime_value,
            current_closing_rate,
            agree_with_20_percent_increase,
        }
    }
}

fn market() -> impl Strategy<Value = Market> {
    prop_oneof![Just(Market::Generic), Just(Market::It)]
}

proptest! {
    #[test]
    fn total_reconciles_with_components(input in valid_input(), market in market()) {
        let out = RoiCalculator::new(market.constants()).calculate(&input);
        let diff = (out.total_loss - (out.salary_cost + out.missed_revenue)).abs();
        prop_assert!(diff <= 1.0, "diff {diff} for {out:?}");
    }

    #[test]
    fn opt_out_has_no_revenue_component(mut input in valid_input(), market in market()) {
        input.agree_with_20_percent_increase = false;
        let out = RoiCalculator::new(market.constants()).calculate(&input);
        prop_assert_eq!(out.missed_revenue, 0.0);
        prop_assert_eq!(out.leads_lost, 0.0);
        prop_assert_eq!(out.total_loss, out.salary_cost);
    }

    #[test]
    fn every_output_is_whole(input in valid_input(), market in market()) {
        let out = RoiCalculator::new(market.constants()).calculate(&input);
        for value in [out.total_loss, out.salary_cost, out.missed_revenue, out.hours_wasted, out.leads_lost] {
            prop_assert_eq!(value.fract(), 0.0);
        }
    }

    #[test]
    fn improved_rate_never_exceeds_cap(rate in 0.0..=100.0f64, market in market()) {
        let constants = market.constants();
        prop_assert!(improved_closing_rate(rate, constants) <= constants.closing_rate_cap);
    }

    #[test]
    fn salary_cost_is_monotonic_in_labor_inputs(
        input in valid_input(),
        bump in 0.0..100.0f64,
        which in 0usize..3,
    ) {
        let mut bigger = input.clone();
        match which {
            0 => bigger.team_size += bump,
            1 => bigger.hours_per_day += bump,
            _ => bigger.hourly_cost += bump,
        }
        prop_assert!(calculate_roi(&bigger).salary_cost >= calculate_roi(&input).salary_cost);
    }

    // Rates above the cap shrink after uplift, so monotonicity only holds up to it.
    #[test]
    fn missed_revenue_is_monotonic_in_pipeline_inputs(
        mut input in valid_input(),
        rate in 0.0..=90.0f64,
        bump in 0.0..1_000.0f64,
        which in 0usize..2,
    ) {
        input.agree_with_20_percent_increase = true;
        input.current_closing_rate = rate;
        let mut bigger = input.clone();
        match which {
            0 => bigger.leads_per_month += bump,
            _ => bigger.customer_lifetime_value += bump,
        }
        prop_assert!(calculate_roi(&bigger).missed_revenue >= calculate_roi(&input).missed_revenue);
    }
}
