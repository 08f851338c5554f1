//! Tests for the staking ledger
//!
//! This module drives the full service against the in-memory store and
//! transfer service, covering the lifecycle, the failure contract and the
//! concurrency properties.

#[cfg(test)]
mod tests {
    use {
        crate::{
            staking::{StakeEvent, StakingConfig, StakingService},
            transfer::{InMemoryTransferService, TransferError, TransferService},
            StakingError,
        },
        futures::future::join_all,
        solana_sdk::pubkey::Pubkey,
        stakevault_common::utils::derive_custody_address,
        stakevault_store::{LedgerStore, MemoryLedgerStore},
        std::sync::Arc,
    };

    struct TestLedger {
        service: Arc<StakingService>,
        transfers: Arc<InMemoryTransferService>,
        controller: Pubkey,
        fee_vault: Pubkey,
        staker: Pubkey,
        mint: Pubkey,
    }

    /// Service over fresh in-memory backends; the staker starts with 1000
    /// units in their holding account.
    async fn ledger_with_fee(fee_bps: u64) -> TestLedger {
        let controller = Pubkey::new_unique();
        let fee_vault = Pubkey::new_unique();
        let staker = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let transfers = Arc::new(InMemoryTransferService::new());
        transfers.credit(&staker, 1000).await.unwrap();

        let store: Arc<dyn LedgerStore> = Arc::new(MemoryLedgerStore::new());
        let service = Arc::new(StakingService::new(
            StakingConfig {
                controller,
                fee_vault,
                initial_fee_bps: fee_bps,
            },
            store,
            transfers.clone(),
        ));

        TestLedger {
            service,
            transfers,
            controller,
            fee_vault,
            staker,
            mint,
        }
    }

    async fn assert_conserved(ledger: &TestLedger, depositors: &[Pubkey]) {
        let mut staked_sum = 0u64;
        for depositor in depositors {
            if let Some(info) = ledger.service.stake_info(depositor).await.unwrap() {
                staked_sum += info.amount;
            }
        }
        let vault = ledger.service.vault(&ledger.mint).await.unwrap().unwrap();
        let custody = ledger.transfers.balance_of(&vault.custody_address).await;
        assert_eq!(staked_sum, vault.total_held);
        assert_eq!(vault.total_held, custody);
    }

    #[test]
    fn test_error_messages_match_contract() {
        assert_eq!(
            StakingError::Unauthorized.to_string(),
            "You are not authorized to perform this action"
        );
        assert_eq!(
            StakingError::InvalidAmount.to_string(),
            "Amount must be greater than zero"
        );
        assert_eq!(
            StakingError::InvalidWithdraw.to_string(),
            "No tokens to withdraw"
        );
    }

    #[tokio::test]
    async fn test_initialize_creates_empty_vault() {
        let ledger = ledger_with_fee(0).await;
        let custody = ledger
            .service
            .initialize(ledger.mint, ledger.controller)
            .await
            .unwrap();

        assert_eq!(custody, derive_custody_address(&ledger.mint));
        assert_eq!(ledger.service.custody_balance(&ledger.mint).await.unwrap(), 0);

        let vault = ledger.service.vault(&ledger.mint).await.unwrap().unwrap();
        assert_eq!(vault.authority, ledger.controller);
        assert_eq!(vault.total_held, 0);
    }

    #[tokio::test]
    async fn test_initialize_rejects_unauthorized_caller() {
        let ledger = ledger_with_fee(0).await;
        let intruder = Pubkey::new_unique();

        let err = ledger
            .service
            .initialize(ledger.mint, intruder)
            .await
            .unwrap_err();
        assert!(matches!(err, StakingError::Unauthorized));

        // Nothing was created.
        assert!(ledger.service.vault(&ledger.mint).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_initialize_twice_is_a_hard_failure() {
        let ledger = ledger_with_fee(0).await;
        ledger
            .service
            .initialize(ledger.mint, ledger.controller)
            .await
            .unwrap();

        let err = ledger
            .service
            .initialize(ledger.mint, ledger.controller)
            .await
            .unwrap_err();
        assert!(matches!(err, StakingError::VaultExists(mint) if mint == ledger.mint));
    }

    #[tokio::test]
    async fn test_initialize_rejects_excessive_fee() {
        let ledger = ledger_with_fee(10_001).await;
        let err = ledger
            .service
            .initialize(ledger.mint, ledger.controller)
            .await
            .unwrap_err();
        assert!(matches!(err, StakingError::InvalidFee));
    }

    /// The full token flow: deposit 500 then 200, bounce a zero and an
    /// uncovered deposit, withdraw everything, bounce the double withdraw.
    #[tokio::test]
    async fn test_full_lifecycle_matches_token_flows() {
        let ledger = ledger_with_fee(0).await;
        let service = ledger.service.clone();
        let transfers = ledger.transfers.clone();
        let (staker, mint) = (ledger.staker, ledger.mint);
        let custody = service.initialize(mint, ledger.controller).await.unwrap();

        let receipt = service.deposit(staker, mint, 500).await.unwrap();
        assert_eq!(receipt.total_staked, 500);
        assert_eq!(transfers.balance_of(&custody).await, 500);
        assert_eq!(transfers.balance_of(&staker).await, 500);

        // Deposits accumulate.
        let receipt = service.deposit(staker, mint, 200).await.unwrap();
        assert_eq!(receipt.total_staked, 700);
        assert_eq!(transfers.balance_of(&custody).await, 700);
        assert_eq!(transfers.balance_of(&staker).await, 300);

        // Zero deposits are rejected without touching anything.
        let err = service.deposit(staker, mint, 0).await.unwrap_err();
        assert!(matches!(err, StakingError::InvalidAmount));
        assert_eq!(service.stake_info(&staker).await.unwrap().unwrap().amount, 700);

        // 300 left in the holding account cannot cover 400.
        let err = service.deposit(staker, mint, 400).await.unwrap_err();
        assert!(matches!(
            err,
            StakingError::Transfer(TransferError::InsufficientFunds {
                available: 300,
                required: 400,
                ..
            })
        ));
        assert_eq!(service.stake_info(&staker).await.unwrap().unwrap().amount, 700);
        assert_eq!(transfers.balance_of(&custody).await, 700);
        assert_conserved(&ledger, &[staker]).await;

        // Withdraw returns the whole stake and resets the entry.
        let receipt = service.withdraw(staker, mint).await.unwrap();
        assert_eq!(receipt.amount, 700);
        assert_eq!(receipt.fee, 0);
        assert_eq!(transfers.balance_of(&staker).await, 1000);
        assert_eq!(transfers.balance_of(&custody).await, 0);
        assert_eq!(service.stake_info(&staker).await.unwrap().unwrap().amount, 0);

        // Double withdraw is rejected.
        let err = service.withdraw(staker, mint).await.unwrap_err();
        assert!(matches!(err, StakingError::InvalidWithdraw));
        assert_conserved(&ledger, &[staker]).await;
    }

    #[tokio::test]
    async fn test_withdraw_without_any_deposit_rejected() {
        let ledger = ledger_with_fee(0).await;
        ledger
            .service
            .initialize(ledger.mint, ledger.controller)
            .await
            .unwrap();

        let err = ledger
            .service
            .withdraw(ledger.staker, ledger.mint)
            .await
            .unwrap_err();
        assert!(matches!(err, StakingError::InvalidWithdraw));
    }

    #[tokio::test]
    async fn test_deposit_requires_vault() {
        let ledger = ledger_with_fee(0).await;
        let err = ledger
            .service
            .deposit(ledger.staker, ledger.mint, 100)
            .await
            .unwrap_err();
        assert!(matches!(err, StakingError::VaultNotFound(_)));
    }

    #[tokio::test]
    async fn test_record_reused_across_stake_cycles() {
        let ledger = ledger_with_fee(0).await;
        ledger
            .service
            .initialize(ledger.mint, ledger.controller)
            .await
            .unwrap();

        ledger.service.deposit(ledger.staker, ledger.mint, 400).await.unwrap();
        ledger.service.withdraw(ledger.staker, ledger.mint).await.unwrap();

        // The zeroed record accepts a fresh cycle.
        let receipt = ledger.service.deposit(ledger.staker, ledger.mint, 250).await.unwrap();
        assert_eq!(receipt.total_staked, 250);

        let info = ledger.service.stake_info(&ledger.staker).await.unwrap().unwrap();
        assert_eq!(info.owner, ledger.staker);
        assert_eq!(info.amount, 250);
        assert!(info.deposit_ts > 0);
        assert_conserved(&ledger, &[ledger.staker]).await;
    }

    #[tokio::test]
    async fn test_conservation_across_depositors() {
        let ledger = ledger_with_fee(0).await;
        ledger
            .service
            .initialize(ledger.mint, ledger.controller)
            .await
            .unwrap();

        let others: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
        for other in &others {
            ledger.transfers.credit(other, 1000).await.unwrap();
        }

        let mut all = others.clone();
        all.push(ledger.staker);

        ledger.service.deposit(ledger.staker, ledger.mint, 500).await.unwrap();
        assert_conserved(&ledger, &all).await;

        ledger.service.deposit(others[0], ledger.mint, 999).await.unwrap();
        assert_conserved(&ledger, &all).await;

        ledger.service.deposit(others[1], ledger.mint, 1).await.unwrap();
        assert_conserved(&ledger, &all).await;

        ledger.service.withdraw(others[0], ledger.mint).await.unwrap();
        assert_conserved(&ledger, &all).await;

        ledger.service.deposit(others[2], ledger.mint, 42).await.unwrap();
        ledger.service.withdraw(ledger.staker, ledger.mint).await.unwrap();
        assert_conserved(&ledger, &all).await;
    }

    #[tokio::test]
    async fn test_concurrent_deposits_lose_no_updates() {
        let ledger = ledger_with_fee(0).await;
        ledger
            .service
            .initialize(ledger.mint, ledger.controller)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let depositor = Pubkey::new_unique();
            ledger.transfers.credit(&depositor, 100).await.unwrap();

            let service = ledger.service.clone();
            let mint = ledger.mint;
            handles.push(tokio::spawn(async move {
                service.deposit(depositor, mint, 100).await
            }));
        }

        for joined in join_all(handles).await {
            joined.unwrap().unwrap();
        }

        let vault = ledger.service.vault(&ledger.mint).await.unwrap().unwrap();
        assert_eq!(vault.total_held, 800);
        assert_eq!(
            ledger.transfers.balance_of(&vault.custody_address).await,
            800
        );
    }

    #[tokio::test]
    async fn test_duplicate_withdraw_race_pays_once() {
        let ledger = ledger_with_fee(0).await;
        ledger
            .service
            .initialize(ledger.mint, ledger.controller)
            .await
            .unwrap();
        ledger.service.deposit(ledger.staker, ledger.mint, 500).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..2 {
            let service = ledger.service.clone();
            let staker = ledger.staker;
            let mint = ledger.mint;
            handles.push(tokio::spawn(async move { service.withdraw(staker, mint).await }));
        }

        let results: Vec<_> = join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        for result in results {
            if let Err(err) = result {
                assert!(matches!(err, StakingError::InvalidWithdraw));
            }
        }

        // Exactly one payout reached the holding account.
        assert_eq!(ledger.transfers.balance_of(&ledger.staker).await, 1000);
        assert_eq!(ledger.service.custody_balance(&ledger.mint).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_withdraw_fee_reaches_fee_vault() {
        let ledger = ledger_with_fee(100).await;
        ledger
            .service
            .initialize(ledger.mint, ledger.controller)
            .await
            .unwrap();

        ledger.service.deposit(ledger.staker, ledger.mint, 500).await.unwrap();
        let receipt = ledger.service.withdraw(ledger.staker, ledger.mint).await.unwrap();

        // 1% of 500
        assert_eq!(receipt.fee, 5);
        assert_eq!(receipt.amount, 495);
        assert_eq!(ledger.transfers.balance_of(&ledger.staker).await, 995);
        assert_eq!(ledger.transfers.balance_of(&ledger.fee_vault).await, 5);
        assert_eq!(ledger.service.custody_balance(&ledger.mint).await.unwrap(), 0);
        assert_conserved(&ledger, &[ledger.staker]).await;
    }

    #[tokio::test]
    async fn test_update_fee_requires_admin() {
        let ledger = ledger_with_fee(0).await;
        ledger
            .service
            .initialize(ledger.mint, ledger.controller)
            .await
            .unwrap();

        let intruder = Pubkey::new_unique();
        let err = ledger.service.update_fee(intruder, 50).await.unwrap_err();
        assert!(matches!(err, StakingError::Unauthorized));

        let err = ledger
            .service
            .update_fee(ledger.controller, 10_001)
            .await
            .unwrap_err();
        assert!(matches!(err, StakingError::InvalidFee));

        // The admin can move the fee, and withdrawals pick it up.
        ledger.service.update_fee(ledger.controller, 200).await.unwrap();
        ledger.service.deposit(ledger.staker, ledger.mint, 1000).await.unwrap();
        let receipt = ledger.service.withdraw(ledger.staker, ledger.mint).await.unwrap();
        assert_eq!(receipt.fee, 20);
        assert_eq!(receipt.amount, 980);
    }

    #[tokio::test]
    async fn test_events_mirror_operations() {
        let ledger = ledger_with_fee(0).await;
        let mut events = ledger.service.subscribe();

        ledger
            .service
            .initialize(ledger.mint, ledger.controller)
            .await
            .unwrap();
        ledger.service.deposit(ledger.staker, ledger.mint, 500).await.unwrap();
        ledger.service.withdraw(ledger.staker, ledger.mint).await.unwrap();
        ledger.service.update_fee(ledger.controller, 25).await.unwrap();

        match events.recv().await.unwrap() {
            StakeEvent::Deposited(receipt) => {
                assert_eq!(receipt.staker, ledger.staker);
                assert_eq!(receipt.amount, 500);
                assert_eq!(receipt.total_staked, 500);
            }
            other => panic!("expected deposit event, got {other:?}"),
        }
        match events.recv().await.unwrap() {
            StakeEvent::Withdrawn(receipt) => {
                assert_eq!(receipt.amount, 500);
                assert_eq!(receipt.total_staked, 0);
            }
            other => panic!("expected withdraw event, got {other:?}"),
        }
        match events.recv().await.unwrap() {
            StakeEvent::FeeUpdated { old_fee, new_fee } => {
                assert_eq!(old_fee, 0);
                assert_eq!(new_fee, 25);
            }
            other => panic!("expected fee event, got {other:?}"),
        }
    }
}
