use super::auth::{Permission, Policy};
use huddle_infra::HuddleContext;
use std::fmt::Debug;
use tracing::{debug, error, warn};

/// A side effect of a successful `UseCase`, such as a chat message that
/// follows a stored change. Subscribers can not fail the `UseCase`, they
/// report their own errors.
#[async_trait::async_trait(?Send)]
pub trait Subscriber<U: UseCase> {
    async fn notify(&self, res: &U::Response, ctx: &HuddleContext);
}

/// One operation of the bot. Chat handlers and background jobs build a
/// `UseCase` and run it with `execute` or `execute_with_policy`.
#[async_trait::async_trait(?Send)]
pub trait UseCase: Debug {
    type Response;
    type Error;

    /// Name used in logs and spans
    const NAME: &'static str;

    async fn execute(&mut self, ctx: &HuddleContext) -> Result<Self::Response, Self::Error>;

    /// Notified in this order after a successful execution
    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        Vec::new()
    }
}

/// `Permission`s a chat user needs to run the `UseCase`
pub trait PermissionBoundary: UseCase {
    fn permissions(&self) -> Vec<Permission>;
}

#[derive(Debug)]
pub enum UseCaseErrorContainer<T: Debug> {
    /// The `Permission`s the user lacks
    Unauthorized(Vec<Permission>),
    UseCase(T),
}

#[tracing::instrument(name = "Executing usecase with policy", skip(usecase, policy, ctx), fields(usecase = U::NAME))]
pub async fn execute_with_policy<U>(
    usecase: U,
    policy: &Policy,
    ctx: &HuddleContext,
) -> Result<U::Response, UseCaseErrorContainer<U::Error>>
where
    U: PermissionBoundary,
    U::Error: Debug,
{
    let missing = policy.missing(&usecase.permissions());
    if !missing.is_empty() {
        warn!("Use case {} refused, missing permissions: {:?}", U::NAME, missing);
        return Err(UseCaseErrorContainer::Unauthorized(missing));
    }

    execute(usecase, ctx)
        .await
        .map_err(UseCaseErrorContainer::UseCase)
}

#[tracing::instrument(name = "Executing usecase", skip(usecase, ctx), fields(usecase = U::NAME))]
pub async fn execute<U>(mut usecase: U, ctx: &HuddleContext) -> Result<U::Response, U::Error>
where
    U: UseCase,
    U::Error: Debug,
{
    let res = usecase.execute(ctx).await;
    match &res {
        Ok(response) => {
            let subscribers = U::subscribers();
            debug!("Use case {} done, notifying {} subscribers", U::NAME, subscribers.len());
            for subscriber in &subscribers {
                subscriber.notify(response, ctx).await;
            }
        }
        Err(e) => error!("Use case {} error: {:?}", U::NAME, e),
    }
    res
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Mutex;

    // Records the order in which subscribers run
    static NOTIFIED: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

    #[derive(Debug)]
    struct CountAnswers {
        fail: bool,
    }

    struct First;
    struct Second;

    #[async_trait::async_trait(?Send)]
    impl Subscriber<CountAnswers> for First {
        async fn notify(&self, _res: &usize, _ctx: &HuddleContext) {
            NOTIFIED.lock().unwrap().push("first");
        }
    }

    #[async_trait::async_trait(?Send)]
    impl Subscriber<CountAnswers> for Second {
        async fn notify(&self, _res: &usize, _ctx: &HuddleContext) {
            NOTIFIED.lock().unwrap().push("second");
        }
    }

    #[async_trait::async_trait(?Send)]
    impl UseCase for CountAnswers {
        type Response = usize;
        type Error = ();

        const NAME: &'static str = "CountAnswers";

        async fn execute(&mut self, _ctx: &HuddleContext) -> Result<usize, ()> {
            if self.fail {
                Err(())
            } else {
                Ok(3)
            }
        }

        fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
            vec![Box::new(First), Box::new(Second)]
        }
    }

    impl PermissionBoundary for CountAnswers {
        fn permissions(&self) -> Vec<Permission> {
            vec![Permission::ListParticipants]
        }
    }

    #[actix_web::main]
    #[test]
    async fn subscribers_run_in_order_only_after_success() {
        let ctx = HuddleContext::create_inmemory();

        assert!(execute(CountAnswers { fail: true }, &ctx).await.is_err());
        assert!(NOTIFIED.lock().unwrap().is_empty());

        assert_eq!(execute(CountAnswers { fail: false }, &ctx).await, Ok(3));
        assert_eq!(*NOTIFIED.lock().unwrap(), vec!["first", "second"]);

        let res = execute_with_policy(CountAnswers { fail: false }, &Policy::default(), &ctx).await;
        match res {
            Err(UseCaseErrorContainer::Unauthorized(missing)) => {
                assert_eq!(missing, vec![Permission::ListParticipants])
            }
            other => panic!("Expected the use case to be refused, got {:?}", other),
        }
        assert_eq!(NOTIFIED.lock().unwrap().len(), 2);
    }
}
