//! TicTacToeClient - main entry point for the crate

use crate::abi::{ContractAbis, DecodedOutputs};
use crate::address::parse_address;
use crate::binding::{ContractBinding, GameBinding};
use crate::config::{ClientOptions, NetworkProfile};
use crate::constants::BOARD_SIZE;
use crate::decoder;
use crate::error::{Error, Result};
use crate::rpc::{CallRequest, EthRpc, HttpRpc};
use crate::signer::sign_and_send;
use crate::tx::{resolve_chain_id, ReceiptPoller, TxBuilder, TxRequest};
use crate::types::{Board, GameStatus, Receipt};
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, TxHash, U256};
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell, RwLock};
use tokio_util::sync::CancellationToken;

/// Everything derived from the active network profile
///
/// Replaced wholesale, never mutated in place: an operation clones the
/// `Arc` when it starts and finishes against that snapshot.
struct Session<R> {
    /// Bumped on every profile switch
    generation: u64,
    profile: NetworkProfile,
    rpc: Arc<R>,
    factory: Option<ContractBinding>,
    game: GameBinding,
    chain_id: Arc<OnceCell<u64>>,
}

impl<R> Clone for Session<R> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            profile: self.profile.clone(),
            rpc: Arc::clone(&self.rpc),
            factory: self.factory.clone(),
            game: self.game.clone(),
            chain_id: Arc::clone(&self.chain_id),
        }
    }
}

/// Client for playing tic-tac-toe against the factory and game contracts
///
/// Write operations run the full transaction lifecycle (build, sign, send,
/// poll, validate) and return once the transaction is mined. Reads go
/// through `eth_call` against the currently bound game.
pub struct TicTacToeClient<R> {
    state: RwLock<Arc<Session<R>>>,
    abis: ContractAbis,
    options: ClientOptions,
    /// Held from nonce fetch until the node accepted the transaction
    tx_lock: Mutex<()>,
    shutdown: CancellationToken,
}

impl TicTacToeClient<HttpRpc> {
    /// Connect to the profile's RPC endpoint over HTTP
    pub fn connect(
        profile: NetworkProfile,
        abis: ContractAbis,
        options: ClientOptions,
    ) -> Result<Self> {
        let rpc = HttpRpc::connect(&profile.rpc_url)?;
        Self::new(rpc, profile, abis, options)
    }

    /// Switch to another network over HTTP
    pub async fn switch_network(&self, profile: NetworkProfile) -> Result<()> {
        let rpc = HttpRpc::connect(&profile.rpc_url)?;
        self.switch_profile(profile, rpc).await
    }
}

impl<R: EthRpc> TicTacToeClient<R> {
    /// Create a client over an existing RPC client
    pub fn new(
        rpc: R,
        profile: NetworkProfile,
        abis: ContractAbis,
        options: ClientOptions,
    ) -> Result<Self> {
        options.poll.validate()?;
        let session = Self::session(0, profile, rpc, &abis)?;

        Ok(Self {
            state: RwLock::new(Arc::new(session)),
            abis,
            options,
            tx_lock: Mutex::new(()),
            shutdown: CancellationToken::new(),
        })
    }

    fn session(
        generation: u64,
        profile: NetworkProfile,
        rpc: R,
        abis: &ContractAbis,
    ) -> Result<Session<R>> {
        let factory = profile
            .factory
            .map(|address| ContractBinding::new(address, Arc::clone(&abis.factory)))
            .transpose()
            .map_err(|e| Error::config(format!("profile {}: {e}", profile.name)))?;

        Ok(Session {
            generation,
            profile,
            rpc: Arc::new(rpc),
            factory,
            game: GameBinding::Unbound,
            chain_id: Arc::new(OnceCell::new()),
        })
    }

    async fn snapshot(&self) -> Arc<Session<R>> {
        Arc::clone(&*self.state.read().await)
    }

    // ========== Profile and bindings ==========

    /// Replace the active profile and RPC client
    ///
    /// The game binding is cleared and the factory binding rebuilt from the
    /// new profile. Operations already running finish on the old network.
    pub async fn switch_profile(&self, profile: NetworkProfile, rpc: R) -> Result<()> {
        let mut state = self.state.write().await;
        let name = profile.name.clone();
        let session = Self::session(state.generation + 1, profile, rpc, &self.abis)?;
        *state = Arc::new(session);
        tracing::info!("Switched to network profile {}", name);
        Ok(())
    }

    /// Set or clear the factory the client creates games with
    pub async fn set_factory_address(&self, address: Option<Address>) -> Result<()> {
        let factory = address
            .map(|address| ContractBinding::new(address, Arc::clone(&self.abis.factory)))
            .transpose()?;

        let mut state = self.state.write().await;
        let mut next = Session::clone(&**state);
        next.profile.factory = address;
        next.factory = factory;
        *state = Arc::new(next);

        match address {
            Some(address) => tracing::info!("Factory set to {}", address),
            None => tracing::info!("Factory cleared"),
        }
        Ok(())
    }

    /// Set or clear the active game
    pub async fn set_game_address(&self, address: Option<Address>) -> Result<()> {
        let game = GameBinding::set_game_address(address, &self.abis.game)?;

        let mut state = self.state.write().await;
        let mut next = Session::clone(&**state);
        next.game = game;
        *state = Arc::new(next);

        match address {
            Some(address) => tracing::info!("Game set to {}", address),
            None => tracing::info!("Game cleared"),
        }
        Ok(())
    }

    /// Bind to an existing game given as `0x`-prefixed hex text
    pub async fn join_game(&self, address: &str) -> Result<Address> {
        let address = parse_address(address)?;
        self.set_game_address(Some(address)).await?;
        Ok(address)
    }

    pub async fn game_address(&self) -> Option<Address> {
        self.state.read().await.game.address()
    }

    pub async fn factory_address(&self) -> Option<Address> {
        self.state
            .read()
            .await
            .factory
            .as_ref()
            .map(ContractBinding::address)
    }

    /// Get the active network profile
    pub async fn profile(&self) -> NetworkProfile {
        self.state.read().await.profile.clone()
    }

    /// Address a player signs with
    pub async fn player_address(&self, player: usize) -> Result<Address> {
        self.state.read().await.profile.keys.address(player)
    }

    /// Latest block number; fails if the node is unreachable
    pub async fn check_connection(&self) -> Result<u64> {
        let session = self.snapshot().await;
        let block = session.rpc.block_number().await?;
        tracing::info!("Connected to {} at block {}", session.profile.name, block);
        Ok(block)
    }

    /// Stop all receipt polling; pending writes fail with [`Error::Cancelled`]
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    // ========== Game Operations ==========

    /// Deploy a new game through the factory and make it the active game
    ///
    /// On any failure the previous game binding is kept.
    pub async fn create_game(&self, player: usize) -> Result<Address> {
        let session = self.snapshot().await;
        let factory = session
            .factory
            .clone()
            .ok_or_else(|| Error::config("no factory: set a factory address first"))?;

        let request = TxRequest::new(factory.address(), factory.call_data("createGame", &[])?)
            .with_optional_gas_limit(self.options.gas.create_gas_limit);
        let receipt = self.submit(&session, player, request).await?;
        let game = decoder::created_game(&receipt, factory.address())?;

        let mut state = self.state.write().await;
        if state.generation != session.generation {
            tracing::warn!(
                "Game {} created on {} after a profile switch, not binding it",
                game,
                session.profile.name
            );
            return Ok(game);
        }

        let mut next = Session::clone(&**state);
        next.game = GameBinding::set_game_address(Some(game), &self.abis.game)?;
        *state = Arc::new(next);

        tracing::info!("Game created at {}", game);
        Ok(game)
    }

    /// Place the player's mark at `(row, col)`, both in `0..=2`
    ///
    /// Succeeds on a mined, successful transaction; the `MoveMade` event
    /// is only logged.
    pub async fn make_move(&self, player: usize, row: u8, col: u8) -> Result<TxHash> {
        if usize::from(row) >= BOARD_SIZE || usize::from(col) >= BOARD_SIZE {
            return Err(Error::invalid_input(format!(
                "move ({row}, {col}) is off the board; row and col must be 0, 1 or 2"
            )));
        }

        let session = self.snapshot().await;
        let game = session.game.require()?.clone();

        let data = game.call_data("makeMove", &[uint8(row), uint8(col)])?;
        let request =
            TxRequest::new(game.address(), data).with_gas_limit(self.options.gas.move_gas_limit);
        let receipt = self.submit(&session, player, request).await?;

        match decoder::move_made(&receipt, game.address()) {
            Some(record) => tracing::info!(
                "Move ({}, {}) by {} confirmed in {}",
                record.row,
                record.col,
                record.player,
                receipt.transaction_hash
            ),
            None => tracing::debug!("No MoveMade event in {}", receipt.transaction_hash),
        }

        Ok(receipt.transaction_hash)
    }

    /// Current board of the active game
    pub async fn board(&self) -> Result<Board> {
        let outputs = self.read("getBoardState").await?;
        decoder::decode_board(&outputs)
    }

    /// Read a zero-argument `bool` view of the active game
    pub async fn read_bool(&self, function: &str) -> Result<bool> {
        let outputs = self.read(function).await?;
        decoder::first_bool(&outputs, function)
    }

    /// Read a zero-argument `address` view of the active game
    pub async fn read_address(&self, function: &str) -> Result<Address> {
        let outputs = self.read(function).await?;
        decoder::first_address(&outputs, function)
    }

    /// Whether the active game has ended, and who won
    pub async fn status(&self) -> Result<GameStatus> {
        let (ended, winner) = futures::future::try_join(
            self.read_bool("gameEnded"),
            self.read_address("winner"),
        )
        .await?;

        Ok(GameStatus {
            ended,
            winner: (winner != Address::ZERO).then_some(winner),
        })
    }

    // ========== Internals ==========

    async fn read(&self, function: &str) -> Result<DecodedOutputs> {
        let session = self.snapshot().await;
        let game = session.game.require()?;

        let data = game.call_data(function, &[])?;
        let raw = session.rpc.call(CallRequest::new(game.address(), data)).await?;
        game.decode_output(function, &raw)
    }

    async fn chain_id(&self, session: &Session<R>) -> Result<u64> {
        session
            .chain_id
            .get_or_try_init(|| resolve_chain_id(session.rpc.as_ref(), session.profile.chain_id))
            .await
            .copied()
    }

    /// Build, sign, send and wait; the receipt returned is successful
    async fn submit(
        &self,
        session: &Session<R>,
        player: usize,
        request: TxRequest,
    ) -> Result<Receipt> {
        if self.shutdown.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let key = session.profile.keys.signer(player)?;
        let chain_id = self.chain_id(session).await?;
        let rpc = session.rpc.as_ref();

        let hash = {
            let _guard = self.tx_lock.lock().await;
            let unsigned = TxBuilder::new(rpc, chain_id).build(key.address(), request).await?;
            sign_and_send(rpc, &unsigned, key).await?
        };

        let receipt = ReceiptPoller::new(rpc, self.options.poll)
            .with_cancellation(self.shutdown.child_token())
            .wait(hash)
            .await?;
        decoder::ensure_success(&receipt)?;

        tracing::info!(
            "Transaction {} confirmed in block {:?} (gas used {})",
            hash,
            receipt.block_number,
            receipt.gas_used
        );
        Ok(receipt)
    }
}

impl<R> Drop for TicTacToeClient<R> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn uint8(value: u8) -> DynSolValue {
    DynSolValue::Uint(U256::from(value), 8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GasPolicy, PollConfig};
    use crate::contracts::{IMultiPlayerTicTacToe, ITicTacToeFactory};
    use crate::rpc::mock::{bool_word, receipt_with_logs, words, MockRpc, ReceiptStep};
    use crate::signer::KeyRing;
    use crate::types::LogEntry;
    use alloy::consensus::TxEnvelope;
    use alloy::eips::Decodable2718;
    use alloy::primitives::{Bytes, B256};
    use alloy::sol_types::{SolCall, SolEvent};
    use std::time::Duration;
    use tokio_test::assert_ok;

    const HARDHAT_KEY_0: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const HARDHAT_KEY_1: &str =
        "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    fn factory() -> Address {
        parse_address("0xa0B53DbDb0052403E38BBC31f01367aC6782118E").unwrap()
    }

    fn new_game() -> Address {
        parse_address("0x9bd03768a7DCc129555dE410FF8E85528A4F88b5").unwrap()
    }

    fn profile() -> NetworkProfile {
        NetworkProfile::new("local", "http://127.0.0.1:8545")
            .with_chain_id(31337)
            .with_keys(KeyRing::from_hex_keys([HARDHAT_KEY_0, HARDHAT_KEY_1]))
            .with_factory(factory())
    }

    fn game_created_receipt() -> Receipt {
        receipt_with_logs(vec![LogEntry::new(
            factory(),
            vec![ITicTacToeFactory::GameCreated::SIGNATURE_HASH, new_game().into_word()],
            Bytes::new(),
        )])
    }

    fn test_client(rpc: &MockRpc, profile: NetworkProfile) -> TicTacToeClient<MockRpc> {
        TicTacToeClient::new(
            rpc.clone(),
            profile,
            ContractAbis::bundled().unwrap(),
            ClientOptions::default(),
        )
        .unwrap()
    }

    fn sent_legacy(rpc: &MockRpc, index: usize) -> alloy::consensus::TxLegacy {
        let raw = &rpc.sent()[index];
        let envelope = TxEnvelope::decode_2718(&mut raw.as_ref()).unwrap();
        envelope.as_legacy().expect("legacy transaction").tx().clone()
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_game_binds_new_address() {
        let rpc = MockRpc::new().mining(game_created_receipt());
        let client = test_client(&rpc, profile());

        let game = assert_ok!(client.create_game(0).await);

        assert_eq!(game, new_game());
        assert_ne!(game, Address::ZERO);
        assert_eq!(client.game_address().await, Some(game));

        // Estimated, signed for the local chain, sent once
        assert_eq!(rpc.count("eth_estimateGas"), 1);
        assert_eq!(rpc.count("eth_sendRawTransaction"), 1);
        let tx = sent_legacy(&rpc, 0);
        assert_eq!(tx.chain_id, Some(31337));
        assert_eq!(tx.gas_limit, 120_000);
        assert_eq!(tx.input.as_ref(), ITicTacToeFactory::createGameCall {}.abi_encode().as_slice());
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_game_with_fixed_gas_skips_estimate() {
        let rpc = MockRpc::new().mining(game_created_receipt());
        let client = TicTacToeClient::new(
            rpc.clone(),
            profile(),
            ContractAbis::bundled().unwrap(),
            ClientOptions::default().with_gas(GasPolicy {
                create_gas_limit: Some(3_000_000),
                ..GasPolicy::default()
            }),
        )
        .unwrap();

        client.create_game(1).await.unwrap();

        assert_eq!(rpc.count("eth_estimateGas"), 0);
        assert_eq!(sent_legacy(&rpc, 0).gas_limit, 3_000_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_create_keeps_previous_game() {
        let previous = Address::repeat_byte(0x77);

        let mut reverted = game_created_receipt();
        reverted.status = Some(0);
        let rpc = MockRpc::new().mining(reverted);
        let client = test_client(&rpc, profile());
        client.set_game_address(Some(previous)).await.unwrap();

        let err = client.create_game(0).await.unwrap_err();
        assert!(matches!(err, Error::OnChainFailure { status: Some(0), .. }));
        assert_eq!(client.game_address().await, Some(previous));

        // Success without the event is not a game either
        let rpc = MockRpc::new().mining(receipt_with_logs(vec![]));
        let client = test_client(&rpc, profile());
        let err = client.create_game(0).await.unwrap_err();
        assert!(matches!(err, Error::EventNotFound { event: "GameCreated", .. }));
        assert_eq!(client.game_address().await, None);
    }

    #[tokio::test]
    async fn test_create_game_without_factory() {
        let rpc = MockRpc::new();
        let client = test_client(
            &rpc,
            NetworkProfile::new("local", "http://127.0.0.1:8545")
                .with_keys(KeyRing::from_hex_keys([HARDHAT_KEY_0])),
        );

        let err = client.create_game(0).await.unwrap_err();

        assert!(matches!(err, Error::Config(msg) if msg.contains("no factory")));
        assert_eq!(rpc.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_move_rejected_before_network() {
        let rpc = MockRpc::new();
        let client = test_client(&rpc, profile());
        client.set_game_address(Some(new_game())).await.unwrap();

        for (row, col) in [(3, 0), (0, 3), (255, 255)] {
            let err = client.make_move(0, row, col).await.unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
        }
        assert_eq!(rpc.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_unbound_game_operations() {
        let rpc = MockRpc::new();
        let client = test_client(&rpc, profile());

        assert!(matches!(client.make_move(0, 1, 1).await, Err(Error::Config(_))));
        assert!(matches!(client.board().await, Err(Error::Config(_))));
        assert!(matches!(client.read_bool("gameEnded").await, Err(Error::Config(_))));
        assert_eq!(rpc.total_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_make_move_uses_fixed_ceiling() {
        let player = parse_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();
        let moved = receipt_with_logs(vec![LogEntry::new(
            new_game(),
            vec![IMultiPlayerTicTacToe::MoveMade::SIGNATURE_HASH, player.into_word()],
            words(&[B256::with_last_byte(1), B256::with_last_byte(2)]),
        )]);
        let rpc = MockRpc::new().with_nonce(4).mining(moved);
        let client = test_client(&rpc, profile());
        client.set_game_address(Some(new_game())).await.unwrap();

        let hash = client.make_move(0, 1, 2).await.unwrap();
        client.make_move(0, 0, 0).await.unwrap();

        assert_eq!(hash, alloy::primitives::keccak256(&rpc.sent()[0]));
        assert_eq!(rpc.count("eth_estimateGas"), 0);

        let first = sent_legacy(&rpc, 0);
        assert_eq!(first.gas_limit, 500_000);
        assert_eq!(first.to, alloy::primitives::TxKind::Call(new_game()));
        let call = IMultiPlayerTicTacToe::makeMoveCall::abi_decode(&first.input).unwrap();
        assert_eq!((call.row, call.col), (1, 2));

        // Back-to-back moves from one signer use consecutive nonces
        assert_eq!(first.nonce, 4);
        assert_eq!(sent_legacy(&rpc, 1).nonce, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reverted_move_is_on_chain_failure() {
        let mut reverted = receipt_with_logs(vec![]);
        reverted.status = None;
        let rpc = MockRpc::new().mining(reverted);
        let client = test_client(&rpc, profile());
        client.set_game_address(Some(new_game())).await.unwrap();

        let err = client.make_move(1, 0, 0).await.unwrap_err();
        assert!(matches!(err, Error::OnChainFailure { status: None, .. }));
    }

    #[tokio::test]
    async fn test_key_errors() {
        let rpc = MockRpc::new();
        let client = test_client(
            &rpc,
            profile().with_keys(KeyRing::from_hex_keys(["0xnot-a-key", HARDHAT_KEY_1])),
        );
        client.set_game_address(Some(new_game())).await.unwrap();

        assert!(matches!(client.make_move(0, 0, 0).await, Err(Error::Signing(_))));
        assert!(matches!(client.make_move(2, 0, 0).await, Err(Error::Config(_))));
        assert!(matches!(client.player_address(0).await, Err(Error::Signing(_))));
        assert_eq!(
            client.player_address(1).await.unwrap(),
            parse_address("0x70997970C51812dc3A010C7d01b50e0d17dc79C8").unwrap()
        );
        assert_eq!(rpc.count("eth_sendRawTransaction"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_chain_id_asked_once_when_not_configured() {
        let rpc = MockRpc::new()
            .with_chain_id(Some(11155111))
            .mining(receipt_with_logs(vec![]));
        let mut profile = profile();
        profile.chain_id = None;
        let client = test_client(&rpc, profile);
        client.set_game_address(Some(new_game())).await.unwrap();

        client.make_move(0, 0, 0).await.unwrap();
        client.make_move(1, 1, 1).await.unwrap();

        assert_eq!(rpc.count("eth_chainId"), 1);
        assert_eq!(sent_legacy(&rpc, 1).chain_id, Some(11155111));
    }

    #[tokio::test]
    async fn test_board_and_status_reads() {
        let x = Address::repeat_byte(0x11);
        let mut cells = vec![B256::ZERO; 9];
        cells[0] = x.into_word();
        cells[4] = x.into_word();
        cells[8] = x.into_word();

        let ended = words(&[bool_word(true)]);
        let x_word = words(&[x.into_word()]);
        let rpc = MockRpc::new()
            .with_call_response(IMultiPlayerTicTacToe::getBoardStateCall::SELECTOR, words(&cells))
            .with_call_response(IMultiPlayerTicTacToe::gameEndedCall::SELECTOR, ended)
            .with_call_response(IMultiPlayerTicTacToe::winnerCall::SELECTOR, x_word.clone())
            .with_call_response(IMultiPlayerTicTacToe::currentPlayerCall::SELECTOR, x_word);
        let client = test_client(&rpc, profile());
        client.join_game("0x9bd03768a7dcc129555de410ff8e85528a4f88b5").await.unwrap();

        let board = client.board().await.unwrap();
        assert_eq!(board.cell(1, 1), Some(x));
        assert!(board.is_empty(0, 1));

        // Independent reads run concurrently on the same snapshot
        let (a, b) = tokio::join!(client.read_bool("gameEnded"), client.read_bool("gameEnded"));
        assert!(a.unwrap() && b.unwrap());

        let status = client.status().await.unwrap();
        assert_eq!(status, GameStatus { ended: true, winner: Some(x) });

        assert_eq!(client.read_address("currentPlayer").await.unwrap(), x);

        // Not declared by the game ABI
        assert!(matches!(client.read_address("owner").await, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_join_game_validates_text() {
        let client = test_client(&MockRpc::new(), profile());
        assert!(matches!(client.join_game("0x1234").await, Err(Error::InvalidInput(_))));
        assert!(matches!(
            client.join_game(" 0x9bd03768a7dcc129555de410ff8e85528a4f88b5 ").await,
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            client.join_game("0x0000000000000000000000000000000000000000").await,
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(client.game_address().await, None);
    }

    #[tokio::test]
    async fn test_profile_switch_unbinds() {
        let client = test_client(&MockRpc::new(), profile());
        client.set_game_address(Some(new_game())).await.unwrap();

        let other_factory = Address::repeat_byte(0xfb);
        let sepolia = NetworkProfile::new("sepolia", "https://rpc.sepolia.example")
            .with_chain_id(11155111)
            .with_factory(other_factory);
        client.switch_profile(sepolia, MockRpc::new()).await.unwrap();

        assert_eq!(client.game_address().await, None);
        assert_eq!(client.factory_address().await, Some(other_factory));
        assert_eq!(client.profile().await.name, "sepolia");

        client.set_factory_address(None).await.unwrap();
        assert_eq!(client.factory_address().await, None);
        assert_eq!(client.profile().await.factory, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_game_finishes_on_old_profile_after_switch() {
        let rpc = MockRpc::new()
            .with_receipt_script([ReceiptStep::NotFound])
            .mining(game_created_receipt());
        let client = test_client(&rpc, profile());
        let replacement = MockRpc::new();

        let (created, _) = tokio::join!(client.create_game(0), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let other = NetworkProfile::new("other", "http://127.0.0.1:9545");
            client.switch_profile(other, replacement.clone()).await.unwrap();
        });

        // Completed against the original node, but not bound on the new profile
        assert_eq!(created.unwrap(), new_game());
        assert_eq!(rpc.count("eth_getTransactionReceipt"), 2);
        assert_eq!(replacement.total_calls(), 0);
        assert_eq!(client.game_address().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_polling() {
        let rpc = MockRpc::new();
        let client = TicTacToeClient::new(
            rpc.clone(),
            profile(),
            ContractAbis::bundled().unwrap(),
            ClientOptions::default().with_poll(PollConfig::default().with_max_attempts(10)),
        )
        .unwrap();

        let (result, _) = tokio::join!(client.create_game(0), async {
            tokio::time::sleep(Duration::from_secs(7)).await;
            client.shutdown();
        });

        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(rpc.count("eth_getTransactionReceipt"), 2);
        assert_eq!(client.game_address().await, None);

        // Nothing is sent after shutdown
        assert!(matches!(client.create_game(0).await, Err(Error::Cancelled)));
        assert_eq!(rpc.count("eth_sendRawTransaction"), 1);
    }

    #[tokio::test]
    async fn test_check_connection() {
        let client = test_client(&MockRpc::new(), profile());
        assert_eq!(client.check_connection().await.unwrap(), 42);
    }

    #[test]
    fn test_bad_poll_config_rejected() {
        let result = TicTacToeClient::new(
            MockRpc::new(),
            profile(),
            ContractAbis::bundled().unwrap(),
            ClientOptions::default().with_poll(PollConfig::default().with_backoff_factor(0.0)),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
