//! Promise-style callbacks over a resolved client.
//!
//! After `send`, the outcome splits cleanly: [`then`](crate::Client::then)
//! sees decoded data when the pipeline completed, [`catch`](crate::Client::catch)
//! sees the fault when it did not, and [`finally`](crate::Client::finally)
//! closes the chain either way.

use crate::client::Client;
use crate::error::Fault;

impl<T> Client<T> {
    /// Runs `f` with the decoded payload when no fault was captured.
    ///
    /// The callback fires whenever decoding succeeded and nothing failed,
    /// even if the business code differs from the configured ok-code; the
    /// mismatch is logged so it does not pass silently.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example() -> Result<(), herald::ConfigError> {
    /// use herald::{shorthand, Table};
    ///
    /// shorthand::get::<serde_json::Value>("https://api.example.com/v1/users", Table::new())
    ///     .await?
    ///     .then(|users| println!("{users}"))
    ///     .catch(|fault| eprintln!("{fault}"))
    ///     .finally(|client| client.report());
    /// # Ok(())
    /// # }
    /// ```
    pub fn then(self, f: impl FnOnce(&T)) -> Self {
        if self.fault().is_none() {
            if let Some(result) = self.result() {
                if result.code == self.ok_code() {
                    tracing::debug!(code = result.code, "request successful");
                } else {
                    tracing::warn!(
                        code = result.code,
                        ok_code = self.ok_code(),
                        msg = %result.msg,
                        "request succeeded but the business code is not the ok-code"
                    );
                }
                f(&result.data);
            }
        }
        self
    }

    /// Runs `f` with the captured fault, when one is present.
    pub fn catch(self, f: impl FnOnce(&Fault)) -> Self {
        if let Some(fault) = self.fault() {
            match fault {
                Fault::Transport { phase, .. } => {
                    tracing::error!(phase = %phase, "request failed in transport");
                }
                Fault::Business { reason, .. } => {
                    tracing::warn!(reason = %reason, "request failed in business terms");
                }
            }
            f(fault);
        }
        self
    }

    /// Always runs `f`, consuming the client and closing the chain.
    ///
    /// Use [`report`](Client::report) inside the callback for the opt-in
    /// structured summary of the exchange.
    pub fn finally(self, f: impl FnOnce(&Self)) {
        f(&self);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::{Error, Phase};
    use crate::response::Envelope;

    fn resolved(code: i64) -> Client<i32> {
        let mut client = Client::<i32>::new();
        client.test_resolve(Envelope {
            code,
            msg: "done".to_string(),
            data: 7,
        });
        client
    }

    #[test]
    fn then_fires_without_fault_and_catch_stays_quiet() {
        let then_hit = Cell::new(false);
        let catch_hit = Cell::new(false);
        resolved(0)
            .then(|data| {
                assert_eq!(*data, 7);
                then_hit.set(true);
            })
            .catch(|_| catch_hit.set(true));
        assert!(then_hit.get());
        assert!(!catch_hit.get());
    }

    #[test]
    fn then_still_fires_on_ok_code_mismatch() {
        let then_hit = Cell::new(false);
        resolved(500).then(|_| then_hit.set(true));
        assert!(then_hit.get());
    }

    #[test]
    fn catch_fires_on_fault_and_then_stays_quiet() {
        let mut client = Client::<i32>::new();
        client.test_fault(Fault::transport(Phase::Execute, Error::EmptyBody));

        let then_hit = Cell::new(false);
        let catch_hit = Cell::new(false);
        client
            .then(|_| then_hit.set(true))
            .catch(|fault| {
                assert!(fault.is_transport());
                catch_hit.set(true);
            })
            .finally(|c| assert!(c.fault().is_some()));
        assert!(!then_hit.get());
        assert!(catch_hit.get());
    }

    #[test]
    fn finally_always_runs() {
        let hit = Cell::new(false);
        resolved(0).finally(|_| hit.set(true));
        assert!(hit.get());

        let hit = Cell::new(false);
        let mut client = Client::<i32>::new();
        client.test_fault(Fault::business("nope"));
        client.finally(|_| hit.set(true));
        assert!(hit.get());
    }
}
