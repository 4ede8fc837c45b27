//! In-memory fakes and fixtures shared by unit tests

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::domain::chain::{ChainReader, ChainResolver, ReserveSnapshot, WalletSigner};
use crate::domain::pool::{Clock, Reserves};
use crate::shared::config::ConfigLoader;
use crate::shared::errors::{ChainReadError, ExecutionError};
use crate::shared::types::Token;

pub const TEST_CHAIN_ID: u64 = 167012;

/// Factory address configured for `TEST_CHAIN_ID` in the sample document
pub const TEST_FACTORY: Address = Address::repeat_byte(0x11);

pub const SAMPLE_CHAIN_CONFIG: &str = r#"{
    "defaultNetworkId": 167012,
    "networks": {
        "167012": {
            "name": "Kasplex Testnet",
            "rpcUrl": "https://rpc.kasplextest.xyz",
            "explorerUrl": "https://explorer.testnet.kasplextest.xyz",
            "currency": { "symbol": "KAS", "decimals": 18 },
            "contracts": {
                "factory": "0x1111111111111111111111111111111111111111",
                "router": "0x2222222222222222222222222222222222222222",
                "ammZapV1": "0x3333333333333333333333333333333333333333"
            },
            "routingBases": ["WKAS", "USDC"]
        },
        "1": {
            "name": "Ethereum",
            "rpcUrl": "https://eth.example.org",
            "currency": { "symbol": "ETH", "decimals": 18 }
        }
    }
}"#;

pub fn chain_resolver() -> ChainResolver {
    ChainResolver::new(ConfigLoader::parse_chain_config(SAMPLE_CHAIN_CONFIG).unwrap())
}

/// 18-decimal token on `TEST_CHAIN_ID` at `0xbbbb…bb`
pub fn token(byte: u8, symbol: &str) -> Token {
    Token::new(Address::repeat_byte(byte), symbol, symbol, 18, TEST_CHAIN_ID)
}

pub fn reserves(token0: Address, token1: Address, reserve0: U256, reserve1: U256) -> Reserves {
    Reserves {
        token0,
        token1,
        reserve0,
        reserve1,
        fetched_at: Instant::now(),
    }
}

#[derive(Default)]
struct ChainState {
    pairs: HashMap<(Address, Address), Address>,
    pools: HashMap<Address, ReserveSnapshot>,
    failing_pools: HashSet<Address>,
    fail_pairs: bool,
    fee_bips: u32,
    fail_fee: bool,
    allowances: HashMap<(Address, Address, Address), U256>,
    fail_allowance: bool,
    created: Vec<Address>,
    fail_listing: bool,
    supplies: HashMap<Address, U256>,
    balances: HashMap<(Address, Address), U256>,
}

/// Chain reader backed by in-memory pools, with call counters and failure switches
#[derive(Default)]
pub struct MockChainReader {
    state: Mutex<ChainState>,
    pair_lookups: AtomicUsize,
    reserve_reads: AtomicUsize,
    fee_reads: AtomicUsize,
}

impl MockChainReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn factory(&self) -> Address {
        TEST_FACTORY
    }

    /// Register a pool for `(token0, token1)` and return its address
    pub fn add_pool(&self, token0: Address, token1: Address, reserve0: U256, reserve1: U256) -> Address {
        let mut state = self.state.lock().unwrap();
        let mut bytes = [0xf0u8; 20];
        bytes[12..].copy_from_slice(&(state.pools.len() as u64 + 1).to_be_bytes());
        let pool = Address::from(bytes);

        state.pairs.insert((token0, token1), pool);
        state.pairs.insert((token1, token0), pool);
        state.created.push(pool);
        state.pools.insert(
            pool,
            ReserveSnapshot {
                token0,
                token1,
                reserve0,
                reserve1,
            },
        );
        pool
    }

    pub fn set_reserves(&self, pool: Address, reserve0: U256, reserve1: U256) {
        let mut state = self.state.lock().unwrap();
        let snapshot = state.pools.get_mut(&pool).unwrap();
        snapshot.reserve0 = reserve0;
        snapshot.reserve1 = reserve1;
    }

    pub fn fail_reserves(&self, pool: Address, fail: bool) {
        let mut state = self.state.lock().unwrap();
        if fail {
            state.failing_pools.insert(pool);
        } else {
            state.failing_pools.remove(&pool);
        }
    }

    pub fn fail_pair_lookups(&self, fail: bool) {
        self.state.lock().unwrap().fail_pairs = fail;
    }

    pub fn set_fee_bips(&self, bips: u32) {
        self.state.lock().unwrap().fee_bips = bips;
    }

    pub fn fail_fee(&self, fail: bool) {
        self.state.lock().unwrap().fail_fee = fail;
    }

    pub fn set_allowance(&self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .allowances
            .insert((token, owner, spender), amount);
    }

    pub fn fail_allowance(&self, fail: bool) {
        self.state.lock().unwrap().fail_allowance = fail;
    }

    pub fn fail_pair_listing(&self, fail: bool) {
        self.state.lock().unwrap().fail_listing = fail;
    }

    pub fn set_total_supply(&self, token: Address, supply: U256) {
        self.state.lock().unwrap().supplies.insert(token, supply);
    }

    pub fn set_balance(&self, token: Address, owner: Address, balance: U256) {
        self.state.lock().unwrap().balances.insert((token, owner), balance);
    }

    pub fn pair_lookups(&self) -> usize {
        self.pair_lookups.load(Ordering::SeqCst)
    }

    pub fn reserve_reads(&self) -> usize {
        self.reserve_reads.load(Ordering::SeqCst)
    }

    pub fn fee_reads(&self) -> usize {
        self.fee_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainReader for MockChainReader {
    async fn get_pair_address(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
    ) -> Result<Address, ChainReadError> {
        self.pair_lookups.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        if state.fail_pairs {
            return Err(ChainReadError::Transport("connection refused".to_string()));
        }
        if factory != TEST_FACTORY {
            return Ok(Address::ZERO);
        }
        Ok(state
            .pairs
            .get(&(token_a, token_b))
            .copied()
            .unwrap_or(Address::ZERO))
    }

    async fn get_reserves(&self, pair: Address) -> Result<ReserveSnapshot, ChainReadError> {
        self.reserve_reads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        if state.failing_pools.contains(&pair) {
            return Err(ChainReadError::Rpc {
                code: -32000,
                message: "execution reverted".to_string(),
            });
        }
        state
            .pools
            .get(&pair)
            .copied()
            .ok_or_else(|| ChainReadError::Decode("empty return data".to_string()))
    }

    async fn get_fee_rate_bips(&self, _factory: Address) -> Result<u32, ChainReadError> {
        self.fee_reads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        if state.fail_fee {
            return Err(ChainReadError::Decode("empty return data".to_string()));
        }
        Ok(state.fee_bips)
    }

    async fn get_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ChainReadError> {
        let state = self.state.lock().unwrap();
        if state.fail_allowance {
            return Err(ChainReadError::Transport("timeout".to_string()));
        }
        Ok(state
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn get_pair_count(&self, _factory: Address) -> Result<U256, ChainReadError> {
        let state = self.state.lock().unwrap();
        if state.fail_listing {
            return Err(ChainReadError::Transport("connection reset".to_string()));
        }
        Ok(U256::from(state.created.len()))
    }

    async fn get_pair_at(&self, _factory: Address, index: u64) -> Result<Address, ChainReadError> {
        let state = self.state.lock().unwrap();
        state
            .created
            .get(index as usize)
            .copied()
            .ok_or_else(|| ChainReadError::Rpc {
                code: -32000,
                message: "execution reverted".to_string(),
            })
    }

    async fn get_pair_tokens(&self, pair: Address) -> Result<(Address, Address), ChainReadError> {
        let state = self.state.lock().unwrap();
        if state.failing_pools.contains(&pair) {
            return Err(ChainReadError::Transport("timeout".to_string()));
        }
        state
            .pools
            .get(&pair)
            .map(|snapshot| (snapshot.token0, snapshot.token1))
            .ok_or_else(|| ChainReadError::Decode("empty return data".to_string()))
    }

    async fn get_total_supply(&self, token: Address) -> Result<U256, ChainReadError> {
        let state = self.state.lock().unwrap();
        if state.failing_pools.contains(&token) {
            return Err(ChainReadError::Transport("timeout".to_string()));
        }
        Ok(state.supplies.get(&token).copied().unwrap_or(U256::ZERO))
    }

    async fn get_balance(&self, token: Address, owner: Address) -> Result<U256, ChainReadError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .balances
            .get(&(token, owner))
            .copied()
            .unwrap_or(U256::ZERO))
    }
}

/// Wallet that records every transaction instead of sending it
pub struct RecordingWallet {
    account: Address,
    sent: Mutex<Vec<(Address, Bytes)>>,
    reject: AtomicBool,
}

impl RecordingWallet {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            sent: Mutex::new(Vec::new()),
            reject: AtomicBool::new(false),
        }
    }

    pub fn reject(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(Address, Bytes)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletSigner for RecordingWallet {
    fn account(&self) -> Address {
        self.account
    }

    async fn send_transaction(&self, to: Address, calldata: Bytes) -> Result<B256, ExecutionError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(ExecutionError::Wallet("user rejected transaction".to_string()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((to, calldata));
        Ok(B256::with_last_byte(sent.len() as u8))
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + *self.offset.lock().unwrap()
    }
}
