//! Counter/balance contract shared by the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Once;

use ledgersim::value::args;
use ledgersim::{
    CircuitTable, CoinPublicKey, ConstructorContext, ConstructorResult, Contract, ContractError,
    ContractResult, ImpureResults, Simulator, SimulatorBlueprint, Value, WitnessTable,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Largest counter the initializer accepts.
pub const MAX_INITIAL_COUNTER: u64 = 1_000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterPrivate {
    pub secret: u64,
    pub nonce: u64,
}

impl CounterPrivate {
    pub fn with_secret(secret: u64) -> Self {
        Self { secret, nonce: 0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterLedger {
    pub counter: u64,
    pub balances: BTreeMap<CoinPublicKey, u64>,
    pub last_caller: Option<CoinPublicKey>,
    pub last_secret: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterPublic {
    pub counter: u64,
    pub total_balance: u64,
    pub last_caller: Option<CoinPublicKey>,
    pub last_secret: Option<u64>,
}

pub fn public_state(ledger: &CounterLedger) -> CounterPublic {
    CounterPublic {
        counter: ledger.counter,
        total_balance: ledger.balances.values().sum(),
        last_caller: ledger.last_caller,
        last_secret: ledger.last_secret,
    }
}

pub type Witnesses = WitnessTable<CounterPrivate, CounterLedger>;
pub type CounterSim = Simulator<CounterContract, CounterPublic>;
pub type CounterBlueprint = SimulatorBlueprint<CounterContract, CounterPublic, u64>;

/// Reports the private secret without touching private state.
pub fn default_witnesses() -> Witnesses {
    Witnesses::new().with("secret_value", |ctx, _| {
        Ok((ctx.private_state.clone(), Value::Uint(ctx.private_state.secret)))
    })
}

pub struct CounterContract {
    witnesses: Witnesses,
}

impl CounterContract {
    pub fn new(witnesses: Witnesses) -> Self {
        Self { witnesses }
    }
}

impl Contract for CounterContract {
    type PrivateState = CounterPrivate;
    type Ledger = CounterLedger;

    fn initial_state(
        &self,
        ctx: ConstructorContext<CounterPrivate>,
        args: &[Value],
    ) -> ContractResult<ConstructorResult<CounterPrivate, CounterLedger>> {
        let counter = args::uint(args, 0)?;
        if counter > MAX_INITIAL_COUNTER {
            return Err(ContractError::assertion("Initial counter too large"));
        }
        Ok(ConstructorResult {
            private_state: ctx.initial_private_state,
            ledger_state: CounterLedger {
                counter,
                ..CounterLedger::default()
            },
            identity: ctx.identity,
        })
    }

    fn circuits(&self) -> CircuitTable<CounterPrivate, CounterLedger> {
        let witnesses = self.witnesses.clone();
        CircuitTable::<CounterPrivate, CounterLedger>::new()
            .pure("get_counter", |ctx, _| Ok(Value::Uint(ctx.ledger.state.counter)))
            .pure("current_caller", |ctx, _| Ok(Value::Key(*ctx.caller())))
            .pure("balance_of", |ctx, args| {
                let owner = args::key(args, 0)?;
                Ok(Value::Uint(ctx.ledger.state.balances.get(&owner).copied().unwrap_or(0)))
            })
            .impure("increment", |mut ctx, _| {
                ctx.ledger.state.counter += 1;
                ctx.ledger.state.last_caller = Some(*ctx.caller());
                Ok(ImpureResults {
                    result: Value::Uint(ctx.ledger.state.counter),
                    context: ctx,
                })
            })
            .impure("deposit", |mut ctx, args| {
                let amount = args::uint(args, 0)?;
                let caller = *ctx.caller();
                let balance = ctx.ledger.state.balances.entry(caller).or_insert(0);
                *balance += amount;
                let result = Value::Uint(*balance);
                ctx.ledger.state.last_caller = Some(caller);
                ctx.private_state.nonce += 1;
                Ok(ImpureResults { result, context: ctx })
            })
            .impure("withdraw", |mut ctx, args| {
                let amount = args::uint(args, 0)?;
                let caller = *ctx.caller();
                // State is touched before the balance check.
                ctx.private_state.nonce += 1;
                ctx.ledger.state.last_caller = Some(caller);
                let balance = ctx.ledger.state.balances.entry(caller).or_insert(0);
                if *balance < amount {
                    return Err(ContractError::assertion("Insufficient balance"));
                }
                *balance -= amount;
                let result = Value::Uint(*balance);
                Ok(ImpureResults { result, context: ctx })
            })
            .impure("reveal_secret", move |mut ctx, _| {
                let (private_state, secret) = witnesses.call("secret_value", ctx.witness_context(), &[])?;
                let secret = secret.as_uint().ok_or_else(|| ContractError::Witness {
                    name: "secret_value".to_string(),
                    message: format!("expected uint, got {}", secret.type_name()),
                })?;
                ctx.private_state = private_state;
                ctx.ledger.state.last_secret = Some(secret);
                Ok(ImpureResults {
                    result: Value::Uint(secret),
                    context: ctx,
                })
            })
    }
}

/// Route simulator logs to the test harness once per test binary.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

pub fn blueprint() -> CounterBlueprint {
    init_tracing();
    counter_blueprint()
}

/// Blueprint without a log subscriber.
pub fn counter_blueprint() -> CounterBlueprint {
    SimulatorBlueprint::<CounterContract, CounterPublic, u64>::builder()
        .contract(CounterContract::new)
        .default_private_state(|| CounterPrivate::with_secret(7))
        .constructor_args(|start| vec![Value::Uint(start)])
        .public_state(public_state)
        .default_witnesses(default_witnesses)
        .build()
        .expect("blueprint is complete")
}

pub fn deploy() -> CounterSim {
    blueprint().deploy(0).expect("deploy succeeds")
}

pub fn key(seed: &str) -> CoinPublicKey {
    CoinPublicKey::from_seed(seed)
}

/// Caller observed by the next invocation, read through the `current_caller` circuit.
pub fn observed_caller(sim: &mut CounterSim) -> CoinPublicKey {
    sim.pure("current_caller", &[])
        .expect("current_caller exists")
        .as_key()
        .expect("current_caller returns a key")
}
