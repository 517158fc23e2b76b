use std::sync::Arc;

use futures_util::stream::{StreamExt as _, TryStreamExt as _};
use linegen::LineGenerator;
use log::{debug, info, warn};
use rizzroast_model::{GenerationMode, RoastLevel, Screen};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::utils::print_err;
use config::Config;
use favorites::FavoritesStore;
use message_bus::{MessageBus, MessageBusSubscription, UiCommand};
use store::KeyValueStorage;
use ui_state::{ScreenState, UiScreen, UiState, FAVORITES_FAILED};

pub(crate) mod config;
mod favorites;
pub(crate) mod message_bus;
pub(crate) mod store;
mod ui_state;

pub struct RizzRoast {
    pickup: ScreenState,
    roast: ScreenState,
    favorites: FavoritesStore,
    generator: Arc<dyn LineGenerator>,
    message_bus: MessageBus,
    // Generation results, delivered directly instead of through the bus.
    finished_tx: UnboundedSender<UiCommand>,
    finished_rx: UnboundedReceiver<UiCommand>,
}

impl RizzRoast {
    pub fn new(
        config: &Config,
        storage: Box<dyn KeyValueStorage + Send>,
        generator: Arc<dyn LineGenerator>,
        message_bus: MessageBus,
    ) -> Self {
        let mut favorites = FavoritesStore::new(storage);
        let pickup = ScreenState::new(config.namespace(Screen::Pickup).clone());
        let roast = ScreenState::new(config.namespace(Screen::Roast).clone());
        favorites.load(&pickup.namespace);
        favorites.load(&roast.namespace);
        let (finished_tx, finished_rx) = unbounded_channel();
        RizzRoast {
            pickup,
            roast,
            favorites,
            generator,
            message_bus,
            finished_tx,
            finished_rx,
        }
    }

    pub fn dispatch_ui_command(&mut self, ui_command: UiCommand) {
        match ui_command {
            UiCommand::InitializeUi => {}
            UiCommand::Generate {
                screen,
                input,
                roast_level,
            } => self.generate(screen, input, roast_level),
            UiCommand::GenerationFinished { screen, result } => {
                self.screen_mut(screen).finish_generation(result)
            }
            UiCommand::SaveFavorite(screen) => self.save_favorite(screen),
            UiCommand::DeleteFavorite(screen, index) => self.delete_favorite(screen, index),
            UiCommand::ClearLine(screen) => self.screen_mut(screen).clear_line(),
            UiCommand::CloseApplication => info!("Closing."),
        }
    }

    pub async fn dispatch_ui_commands(mut self, subscription: MessageBusSubscription) {
        let mut ui_command_stream = subscription.ui_command_stream().boxed();
        loop {
            let next = tokio::select! {
                next = ui_command_stream.try_next() => next,
                Some(finished) = self.finished_rx.recv() => Ok(Some(finished)),
            };
            match next {
                Ok(Some(command @ UiCommand::CloseApplication)) => {
                    self.dispatch_ui_command(command);
                    break;
                }
                Ok(Some(command)) => {
                    self.dispatch_ui_command(command);
                }
                Ok(None) => {
                    break;
                }
                Err(e) => {
                    // Only lag is reported here, skipped commands are gone
                    warn!("UI command stream: {e:#}");
                }
            }
            self.message_bus.send(self.ui_state().into())
        }
    }

    pub fn ui_state(&self) -> UiState {
        UiState {
            pickup: self.ui_screen(&self.pickup),
            roast: self.ui_screen(&self.roast),
        }
    }

    fn ui_screen(&self, state: &ScreenState) -> UiScreen {
        UiScreen::new(state, self.favorites.get(&state.namespace))
    }

    fn screen_mut(&mut self, screen: Screen) -> &mut ScreenState {
        match screen {
            Screen::Pickup => &mut self.pickup,
            Screen::Roast => &mut self.roast,
        }
    }

    fn generate(&mut self, screen: Screen, input: String, roast_level: Option<RoastLevel>) {
        if input.trim().is_empty() {
            debug!("{screen}: empty input, not generating");
            return;
        }
        if !self.screen_mut(screen).begin_generation() {
            info!("{screen}: generation already in progress");
            return;
        }
        let mode = GenerationMode::for_screen(screen, roast_level);
        let generator = self.generator.clone();
        let finished = self.finished_tx.clone();
        tokio::spawn(async move {
            let result = generator.generate(mode, &input).await.map_err(|e| e.to_string());
            if finished
                .send(UiCommand::GenerationFinished { screen, result })
                .is_err()
            {
                debug!("{screen}: dispatcher gone, dropping generation result");
            }
        });
    }

    fn save_favorite(&mut self, screen: Screen) {
        let state = self.screen_mut(screen);
        let Some(line) = state.current_line.clone() else {
            debug!("{screen}: nothing to save");
            return;
        };
        let namespace = state.namespace.clone();
        let result = self.favorites.save(&namespace, &line).map(|_| ());
        self.record_favorites_result(screen, result);
    }

    fn delete_favorite(&mut self, screen: Screen, index: usize) {
        let namespace = self.screen_mut(screen).namespace.clone();
        let result = self.favorites.delete(&namespace, index).map(|_| ());
        self.record_favorites_result(screen, result);
    }

    fn record_favorites_result(&mut self, screen: Screen, result: anyhow::Result<()>) {
        let state = self.screen_mut(screen);
        match result {
            Ok(()) => state.error = None,
            Err(e) => {
                print_err(&e);
                state.error = Some(FAVORITES_FAILED.into());
            }
        }
    }
}
