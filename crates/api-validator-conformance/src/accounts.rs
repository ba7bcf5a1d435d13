// crates/api-validator-conformance/src/accounts.rs
// ============================================================================
// Module: Accounts Conformance Suite
// Description: Listing, cross-reference, and detail checks for accounts.
// Purpose: Verify an accounts API honors balance inclusion and id resolution.
// Dependencies: api-validator-core, crate::{failure, harness, report}
// ============================================================================

//! ## Overview
//! The suite checks three properties of an accounts implementation:
//! - listings omit balances unless `balances=true` is requested, and include
//!   them on every account when it is,
//! - every listed account resolves on the detail endpoint under the same id,
//! - the detail endpoint follows the same balance inclusion rules.
//!
//! Group fixtures are fetched once and shared by reference. Checks are
//! fail-fast on the first counterexample and otherwise independent. Only a
//! `not-found` service error is tolerated, and only while resolving listed
//! accounts; every other client error fails the check that observed it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use api_validator_core::Account;
use api_validator_core::AccountId;
use api_validator_core::AccountsClient;
use api_validator_core::AccountsListing;
use api_validator_core::ClientError;
use api_validator_core::GetAccountDetailsOptions;
use api_validator_core::GetAccountsOptions;

use crate::events::ConformanceEventSink;
use crate::failure::CheckFailure;
use crate::harness::CheckFilter;
use crate::harness::CheckSpec;
use crate::harness::SuiteRun;
use crate::report::SuiteReport;


// ============================================================================
// SECTION: Check Tree
// ============================================================================

/// Suite name and root group.
pub const SUITE_NAME: &str = "Accounts";

/// Root group.
const ROOT: &[&str] = &[SUITE_NAME];
/// Listing endpoint group.
const LISTING: &[&str] = &[SUITE_NAME, "/accounts"];
/// Listing with balances requested.
const LISTING_WITH_BALANCES: &[&str] = &[SUITE_NAME, "/accounts", "With balances"];
/// Listing cross-referenced against the detail endpoint.
const LISTING_INTERACTION: &[&str] =
    &[SUITE_NAME, "/accounts", "Interaction with /accounts/:accountId"];
/// Detail endpoint group.
const DETAILS: &[&str] = &[SUITE_NAME, "/accounts/:accountId"];
/// Detail lookup without options.
const DETAILS_DEFAULT: &[&str] = &[SUITE_NAME, "/accounts/:accountId", "Default request"];
/// Detail lookup with balances requested.
const DETAILS_WITH_BALANCES: &[&str] = &[SUITE_NAME, "/accounts/:accountId", "With balances"];

/// Listing omits balances by default.
pub const LISTING_EXCLUDES_BALANCES: CheckSpec =
    CheckSpec::new(LISTING, "should exclude balances in each account response by default");
/// Listing includes balances on request.
pub const LISTING_INCLUDES_BALANCES: CheckSpec =
    CheckSpec::new(LISTING_WITH_BALANCES, "should respond with accounts balances");
/// Every listed account resolves on the detail endpoint.
pub const LISTING_RESOLVES_IN_DETAILS: CheckSpec = CheckSpec::new(
    LISTING_INTERACTION,
    "should find each account in response on account details endpoint",
);
/// The listing yields a representative account.
pub const DETAILS_HAS_ACCOUNT: CheckSpec =
    CheckSpec::new(DETAILS, "should have at least one account from accounts response");
/// Detail omits balances by default.
pub const DETAILS_EXCLUDES_BALANCES: CheckSpec =
    CheckSpec::new(DETAILS_DEFAULT, "should not have account balances in response");
/// Detail includes balances on request.
pub const DETAILS_INCLUDES_BALANCES: CheckSpec =
    CheckSpec::new(DETAILS_WITH_BALANCES, "should have account balances in response");

/// Every accounts check in execution order.
pub const CHECKS: &[CheckSpec] = &[
    LISTING_EXCLUDES_BALANCES,
    LISTING_INCLUDES_BALANCES,
    LISTING_RESOLVES_IN_DETAILS,
    DETAILS_HAS_ACCOUNT,
    DETAILS_EXCLUDES_BALANCES,
    DETAILS_INCLUDES_BALANCES,
];

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Accounts conformance suite bound to one client.
pub struct AccountsSuite<'a, C: AccountsClient + ?Sized> {
    /// Client shared read-only by every check.
    client: &'a C,
}

impl<'a, C: AccountsClient + ?Sized> AccountsSuite<'a, C> {
    /// Binds the suite to a client.
    #[must_use]
    pub const fn new(client: &'a C) -> Self {
        Self {
            client,
        }
    }

    /// Runs every selected check and returns the suite report.
    pub async fn run(&self, filter: CheckFilter, sink: &dyn ConformanceEventSink) -> SuiteReport {
        let mut run = SuiteRun::new(SUITE_NAME, CHECKS, filter, sink);
        if !run.group_selected(ROOT) {
            run.skip_group(ROOT);
            return run.into_report();
        }

        let listing = match self.client.get_accounts(GetAccountsOptions::default()).await {
            Ok(listing) => listing,
            Err(err) => {
                run.fail_group(ROOT, "accounts listing", &err);
                return run.into_report();
            }
        };

        run.run_check(&LISTING_EXCLUDES_BALANCES, || check_listing_excludes_balances(&listing));
        self.run_balanced_listing(&mut run).await;
        if let Some(timer) = run.begin(&LISTING_RESOLVES_IN_DETAILS) {
            let result = check_listing_resolves(self.client, &listing).await;
            run.finish(timer, result);
        }

        let account_id = listing.first_id();
        run.run_check(&DETAILS_HAS_ACCOUNT, || {
            account_id.map(|_| ()).ok_or(CheckFailure::NoAccounts)
        });
        self.run_detail(&mut run, DETAILS_DEFAULT, &DETAILS_EXCLUDES_BALANCES, account_id, false)
            .await;
        self.run_detail(
            &mut run,
            DETAILS_WITH_BALANCES,
            &DETAILS_INCLUDES_BALANCES,
            account_id,
            true,
        )
        .await;

        run.into_report()
    }

    /// Fetches the balance-inclusive listing and checks it.
    async fn run_balanced_listing(&self, run: &mut SuiteRun<'_>) {
        if !run.group_selected(LISTING_WITH_BALANCES) {
            run.skip_group(LISTING_WITH_BALANCES);
            return;
        }
        match self.client.get_accounts(GetAccountsOptions::with_balances()).await {
            Ok(listing) => {
                run.run_check(&LISTING_INCLUDES_BALANCES, || {
                    check_listing_includes_balances(&listing)
                });
            }
            Err(err) => {
                run.fail_group(LISTING_WITH_BALANCES, "accounts listing with balances", &err);
            }
        }
    }

    /// Fetches the representative account and checks its balance shape.
    async fn run_detail(
        &self,
        run: &mut SuiteRun<'_>,
        group: &[&str],
        spec: &CheckSpec,
        account_id: Option<&AccountId>,
        balances: bool,
    ) {
        if !run.group_selected(group) {
            run.skip_group(group);
            return;
        }
        let Some(account_id) = account_id else {
            run.run_check(spec, || Err(CheckFailure::NoAccounts));
            return;
        };
        let mut options = GetAccountDetailsOptions::new(account_id.clone());
        if balances {
            options = options.with_balances();
        }
        match self.client.get_account_details(options).await {
            Ok(account) => run.run_check(spec, || {
                if balances {
                    check_includes_balances(&account)
                } else {
                    check_excludes_balances(&account)
                }
            }),
            Err(err) => run.fail_group(group, "account details", &err),
        }
    }
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Fails on the first listed account carrying balances.
///
/// # Errors
///
/// Returns [`CheckFailure::UnexpectedBalances`] naming the offending account.
pub fn check_listing_excludes_balances(listing: &AccountsListing) -> Result<(), CheckFailure> {
    listing.accounts.iter().try_for_each(check_excludes_balances)
}

/// Fails on the first listed account lacking balances.
///
/// # Errors
///
/// Returns [`CheckFailure::MissingBalances`] naming the offending account.
pub fn check_listing_includes_balances(listing: &AccountsListing) -> Result<(), CheckFailure> {
    listing.accounts.iter().try_for_each(check_includes_balances)
}

/// Fails when the account carries balances.
///
/// # Errors
///
/// Returns [`CheckFailure::UnexpectedBalances`].
pub fn check_excludes_balances(account: &Account) -> Result<(), CheckFailure> {
    if account.has_balances() {
        return Err(CheckFailure::UnexpectedBalances {
            account_id: account.id.clone(),
        });
    }
    Ok(())
}

/// Fails when the account lacks balances.
///
/// # Errors
///
/// Returns [`CheckFailure::MissingBalances`].
pub fn check_includes_balances(account: &Account) -> Result<(), CheckFailure> {
    if !account.has_balances() {
        return Err(CheckFailure::MissingBalances {
            account_id: account.id.clone(),
        });
    }
    Ok(())
}

/// Resolves every listed account on the detail endpoint, in listing order.
///
/// # Errors
///
/// Returns [`CheckFailure::NotResolved`] for the first account that does not
/// resolve, or [`CheckFailure::Client`] when a lookup fails with anything
/// other than `not-found`.
pub async fn check_listing_resolves<C: AccountsClient + ?Sized>(
    client: &C,
    listing: &AccountsListing,
) -> Result<(), CheckFailure> {
    for account in &listing.accounts {
        if !resolve_in_details(client, &account.id).await? {
            return Err(CheckFailure::NotResolved {
                account_id: account.id.clone(),
            });
        }
    }
    Ok(())
}

/// Returns whether the detail endpoint knows the account under the same id.
///
/// A `not-found` service error yields `Ok(false)`; so does a success payload
/// whose id differs from the requested one.
///
/// # Errors
///
/// Returns the [`ClientError`] for every other failure.
pub async fn resolve_in_details<C: AccountsClient + ?Sized>(
    client: &C,
    account_id: &AccountId,
) -> Result<bool, ClientError> {
    match client.get_account_details(GetAccountDetailsOptions::new(account_id.clone())).await {
        Ok(account) => Ok(&account.id == account_id),
        Err(err) if err.is_not_found() => Ok(false),
        Err(err) => Err(err),
    }
}
