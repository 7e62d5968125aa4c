use round_curve::*;

fn amt(v: u64) -> Amount {
    Amount::from(v)
}

/// One token at 7 decimals per round: each round costs `round` stable units.
fn one_token_rounds() -> CurveParams {
    CurveParams {
        round_volume: amt(10_000_000),
        ..Default::default()
    }
}

#[test]
fn test_mint_for_stable_inside_first_round() {
    let p = CurveParams::default();
    let engine = ConversionEngine::new(&p, Amount::zero()).unwrap();

    let quote = engine
        .quote_mint_tokens_for_exact_stable(&amt(1_000_000))
        .unwrap();

    // 5% extracted: 1_000_000 * 1_000_000 / 1_050_000 = 952_380 net
    assert_eq!(quote.net_stable, amt(952_380));
    assert_eq!(quote.fee, amt(47_620));
    // price(1) = 1 per 10^7 units
    assert_eq!(quote.amount, amt(952_380 * 10_000_000));
    assert_eq!(quote.start_round, 1);
    assert_eq!(quote.end_round, 1);
}

#[test]
fn test_mint_for_stable_across_many_rounds() {
    let p = one_token_rounds();
    let engine = ConversionEngine::new(&p, Amount::zero()).unwrap();

    let quote = engine
        .quote_mint_tokens_for_exact_stable(&amt(1_000_000))
        .unwrap();

    // rounds 1..=1379 cost 1 + 2 + ... + 1379 = 951_510 of the 952_380 net;
    // the last 870 buy 870 * 10^7 / 1380 units in round 1380
    assert_eq!(quote.amount, amt(1_379 * 10_000_000 + 6_304_347));
    assert_eq!(quote.fee, amt(47_620));
    assert_eq!(quote.end_round, 1_380);
    assert_eq!(quote.rounds_crossed(), 1_379);
}

#[test]
fn test_mint_pair_reconciles_on_round_boundary() {
    let p = CurveParams::default();
    let engine = ConversionEngine::new(&p, Amount::zero()).unwrap();
    let tokens = amt(1_500_000 * 10_000_000);

    // 10^13 at price 1 + 5 * 10^12 at price 2 = 2_000_000 net, plus 5%
    let (gross, fee) = engine.mint_stable_for_exact_tokens(&tokens).unwrap();
    assert_eq!(gross, amt(2_100_000));
    assert_eq!(fee, amt(100_000));

    let (tokens_back, fee_back) = engine.mint_tokens_for_exact_stable(&gross).unwrap();
    assert_eq!(tokens_back, tokens);
    assert_eq!(fee_back, fee);
}

#[test]
fn test_burn_everything_then_ask_for_proceeds() {
    let p = CurveParams::default();
    let supply = amt(1_500_000 * 10_000_000);
    let engine = ConversionEngine::new(&p, supply.clone()).unwrap();

    let burned = engine.quote_burn_exact_tokens_for_stable(&supply).unwrap();
    assert_eq!(burned.gross_stable, amt(2_000_000));
    assert_eq!(burned.amount, amt(1_904_761));
    assert_eq!(burned.fee, amt(95_239));
    assert_eq!(burned.start_round, 2);
    assert_eq!(burned.end_round, 1);

    let (tokens, fee) = engine.burn_tokens_for_exact_stable(&burned.amount).unwrap();
    assert_eq!(fee, amt(95_238));
    // one stable unit of truncation at price 1 is worth 10^7 token units
    assert!(tokens <= supply);
    assert_eq!(supply.abs_diff(&tokens), amt(10_000_000));
}

#[test]
fn test_burn_more_than_supply_rejected() {
    let p = CurveParams::default();
    let supply = amt(1_500_000 * 10_000_000);
    let engine = ConversionEngine::new(&p, supply.clone()).unwrap();

    let err = engine
        .burn_exact_tokens_for_stable(&(&supply + &amt(1)))
        .unwrap_err();
    assert_eq!(
        err,
        CurveError::CapacityExhausted {
            requested: &supply + &amt(1),
            available: supply,
        }
    );
    assert!(err.to_string().contains("insufficient circulating supply"));

    assert!(matches!(
        engine.burn_tokens_for_exact_stable(&amt(1_904_762 * 2)),
        Err(CurveError::CapacityExhausted { .. })
    ));
}

#[test]
fn test_capacity_invariant_over_snapshots() {
    let p = CurveParams {
        round_volume: amt(1_000),
        dst_decimals: 0,
        ..Default::default()
    };
    for distributed in [0u64, 1, 999, 1_000, 1_001, 2_500, 9_999, 10_000] {
        let oracle = RoundOracle::new(&p, amt(distributed)).unwrap();
        let cur = oracle.current_round().unwrap();
        for round in 1..=cur + 3 {
            let state = oracle.round_state(round).unwrap();
            assert_eq!(&state.remaining + &state.minted, p.round_volume);
        }
    }
}

#[test]
fn test_minted_capacity_sums_to_distributed() {
    let p = CurveParams {
        round_volume: amt(1_000),
        dst_decimals: 0,
        ..Default::default()
    };
    let oracle = RoundOracle::new(&p, amt(3_250)).unwrap();
    let cur = oracle.current_round().unwrap();
    let mut total = Amount::zero();
    for round in 1..=cur {
        total += oracle.minted_capacity(round).unwrap();
    }
    assert_eq!(&total, oracle.distributed());
}

#[test]
fn test_price_strictly_increases_on_ladder() {
    let p = CurveParams {
        price_step: amt(3),
        start_round: 4,
        base_price: amt(2),
        ..Default::default()
    };
    for round in p.start_round..p.start_round + 500 {
        assert!(price_for_round(round + 1, &p) > price_for_round(round, &p));
    }
    assert_eq!(price_for_round(1, &p), amt(2));
    assert_eq!(price_for_round(4, &p), amt(3));
}

#[test]
fn test_zero_requests_return_zero_pairs() {
    let p = CurveParams::default();
    let engine = ConversionEngine::new(&p, amt(42_000_000_000_000)).unwrap();
    let zero = (Amount::zero(), Amount::zero());

    assert_eq!(engine.mint_tokens_for_exact_stable(&Amount::zero()).unwrap(), zero);
    assert_eq!(engine.mint_stable_for_exact_tokens(&Amount::zero()).unwrap(), zero);
    assert_eq!(engine.burn_exact_tokens_for_stable(&Amount::zero()).unwrap(), zero);
    assert_eq!(engine.burn_tokens_for_exact_stable(&Amount::zero()).unwrap(), zero);
}

#[test]
fn test_quotes_are_deterministic_per_snapshot() {
    let p = CurveParams::default();
    let a = ConversionEngine::new(&p, amt(12_345_678_901_234)).unwrap();
    let b = ConversionEngine::new(&p, amt(12_345_678_901_234)).unwrap();
    let c = ConversionEngine::new(&p, amt(22_345_678_901_234)).unwrap();
    let request = amt(5_000_000);

    let qa = a.quote_mint_tokens_for_exact_stable(&request).unwrap();
    let qb = b.quote_mint_tokens_for_exact_stable(&request).unwrap();
    let qc = c.quote_mint_tokens_for_exact_stable(&request).unwrap();
    assert_eq!(qa, qb);
    // later snapshot sits higher on the ladder
    assert!(qc.amount < qa.amount);
}

#[test]
fn test_amounts_beyond_machine_words() {
    let p = CurveParams::default();

    // round index itself no longer fits
    let huge: Amount = "340282366920938463463374607431768211456000".parse().unwrap();
    assert_eq!(
        ConversionEngine::new(&p, huge).unwrap_err(),
        CurveError::CalculationOverflow("current round index")
    );

    // 10^30 distributed: round 10^17 + 1 sits exactly on a boundary
    let deep: Amount = "1000000000000000000000000000000".parse().unwrap();
    let engine = ConversionEngine::new(&p, deep).unwrap();
    let quote = engine
        .quote_mint_stable_for_exact_tokens(&amt(10_000_000))
        .unwrap();
    assert_eq!(quote.start_round, 100_000_000_000_000_001);
    assert_eq!(quote.net_stable, amt(100_000_000_000_000_001));
    assert_eq!(quote.fee, amt(5_000_000_000_000_000));
    assert_eq!(quote.amount, amt(105_000_000_000_000_001));
}

#[test]
fn test_quote_serializes_amounts_as_strings() {
    let p = CurveParams::default();
    let engine = ConversionEngine::new(&p, Amount::zero()).unwrap();
    let quote = engine
        .quote_mint_tokens_for_exact_stable(&amt(1_000_000))
        .unwrap();

    let json = serde_json::to_value(&quote).unwrap();
    assert_eq!(json["kind"], "mint_tokens_for_exact_stable");
    assert_eq!(json["amount"], "9523800000000");
    assert_eq!(json["fee"], "47620");
    assert_eq!(json["start_round"], 1);

    let back: Quote = serde_json::from_value(json).unwrap();
    assert_eq!(back, quote);
}
