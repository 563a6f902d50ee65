use crate::catalog::VisualizationId;

/// User actions that can be triggered by slash commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Show help in the status line
    Help,
    /// Restart the guided tour, or bring it back if it was closed
    RestartTour,
    /// Open a panel in the side slot
    OpenPanel(VisualizationId),
    /// Close the side-slot panel
    ClosePanel,
    /// Quit application
    Quit,
}
