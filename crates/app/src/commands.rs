//! Command execution.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use snapshop_application::ports::{HttpTransport, KeyValueStore};
use snapshop_application::{
    ApiClient, AuthOperations, CredentialStore, OperationError, OperationResult, ProductSearch,
    SessionService, SessionState, WishlistOperations, WishlistState,
};
use snapshop_domain::{ApiRequest, ClientConfig, ImageUpload, Product};
use snapshop_infrastructure::ReqwestTransport;
use tracing::debug;

use crate::cli::{AddItemArgs, Command, WishlistCommand};

const PING_FAILED: &str = "Backend unreachable.";
const NOT_LOGGED_IN: &str = "Not logged in. Run `snapshop login` first.";

/// Wired-up client components for one invocation.
pub struct App {
    config: ClientConfig,
    session: SessionState,
    client: ApiClient,
    sessions: SessionService,
    search: ProductSearch,
    wishlist: WishlistState,
}

impl App {
    /// Builds the components and restores the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be built or the stored
    /// credentials cannot be read.
    pub async fn bootstrap(
        config: ClientConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, Box<dyn Error>> {
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(&config)?);
        let session = SessionState::restore(CredentialStore::new(storage)).await?;
        let client = ApiClient::new(transport, session.clone())
            .with_refresh_policy(config.refresh_policy);

        let wishlist = WishlistState::new(WishlistOperations::new(client.clone()));
        let sessions = SessionService::new(
            session.clone(),
            AuthOperations::new(client.clone()),
            wishlist.clone(),
        );
        let search = ProductSearch::new(client.clone(), &config.country_code, &config.currency);

        debug!(base_url = %config.base_url, authenticated = session.is_authenticated(), "client ready");
        Ok(Self {
            config,
            session,
            client,
            sessions,
            search,
            wishlist,
        })
    }

    /// Runs one command, printing its result to stdout.
    ///
    /// # Errors
    ///
    /// Returns the operation failure; session expiry is reported as
    /// `OperationError::SessionExpired`.
    pub async fn run(&self, command: Command) -> OperationResult<()> {
        match command {
            Command::Ping => self.ping().await,
            Command::Login { email, password } => {
                let user = self.sessions.login(&email, &password).await?;
                println!("Logged in as {}", user.display_name());
                Ok(())
            }
            Command::Signup {
                username,
                email,
                password,
            } => {
                let user = self.sessions.signup(&username, &email, &password).await?;
                println!("Account created. Logged in as {}", user.display_name());
                Ok(())
            }
            Command::Logout => {
                self.sessions.logout().await?;
                println!("Logged out");
                Ok(())
            }
            Command::Whoami => {
                match self.session.user() {
                    Some(user) if self.session.is_authenticated() => {
                        println!("{} <{}>", user.display_name(), user.email);
                    }
                    _ => println!("Not logged in"),
                }
                Ok(())
            }
            Command::Analyze { image } => self.analyze(&image).await,
            Command::Search { query } => {
                let outcome = self.search.search(&query.join(" ")).await?;
                print_products(&outcome.products);
                Ok(())
            }
            Command::Wishlist(command) => self.wishlist(command).await,
        }
    }

    async fn ping(&self) -> OperationResult<()> {
        let response = self
            .client
            .request(ApiRequest::get("/").anonymous())
            .await
            .map_err(|e| OperationError::from_client(e, PING_FAILED))?;
        let message = response
            .error_message()
            .unwrap_or_else(|| response.status.to_string());
        println!("{}: {message}", self.config.normalized_base_url());
        Ok(())
    }

    async fn analyze(&self, path: &Path) -> OperationResult<()> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| OperationError::Validation(format!("cannot read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let outcome = self
            .search
            .analyze_image(ImageUpload::new(file_name, bytes))
            .await?;

        if let Some(info) = &outcome.product_info {
            println!("Category:   {}", info.category.join(", "));
            println!("Attributes: {}", info.attributes.join(", "));
        }
        if !outcome.search_terms.is_empty() {
            println!("Searched:   {}", outcome.search_terms.join(" | "));
        }
        print_products(&outcome.products);
        Ok(())
    }

    async fn wishlist(&self, command: WishlistCommand) -> OperationResult<()> {
        if !self.session.is_authenticated() {
            return Err(OperationError::failed(NOT_LOGGED_IN));
        }
        self.wishlist.refresh().await?;

        match command {
            WishlistCommand::List => {
                print_products(self.wishlist.snapshot().items());
            }
            WishlistCommand::Add(args) => {
                let product = self.product_from(args);
                let title = product.title.clone();
                if self.wishlist.add(product).await? {
                    println!("Added \"{title}\" to the wishlist");
                } else {
                    println!("\"{title}\" is already in the wishlist");
                }
            }
            WishlistCommand::Remove { id } => {
                self.wishlist.remove(&id).await?;
                println!("Removed {id} from the wishlist");
            }
        }
        Ok(())
    }

    fn product_from(&self, args: AddItemArgs) -> Product {
        Product {
            id: args.id,
            title: args.title,
            price: args.price,
            currency: args
                .currency
                .unwrap_or_else(|| self.config.currency.clone()),
            platform: args.platform,
            image_url: args.image_url,
            source_link: args.source_link,
        }
    }
}

fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("No products found");
        return;
    }
    for (index, product) in products.iter().enumerate() {
        println!(
            "{:>2}. {} - {:.2} {} ({})",
            index + 1,
            product.title,
            product.price,
            product.currency,
            product.platform
        );
        println!("    id: {}  {}", product.id, product.source_link);
    }
}
