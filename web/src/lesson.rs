use crate::cookie::CookiePreferenceStore;
use crate::help::HelpDialog;
use bitflags::bitflags;
use clap::Args;
use countgrid_core as grid;
use countgrid_core::PreferenceStore;
use gloo::timers::callback::Timeout;
use serde::{Deserialize, Serialize};
use web_sys::HtmlInputElement;
use yew::prelude::*;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct CellPointerState {
    pos: grid::Coord2,
    buttons: MouseButtons,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum CellMsg {
    Press(CellPointerState),
    Enter(CellPointerState),
    Release(CellPointerState),
}

/// What the component has to do after a pointer event reached the engine.
#[derive(Copy, Clone, Debug, PartialEq)]
enum PointerEffect {
    Nothing,
    Redraw,
    ScheduleExpiry(grid::MessageTicket),
}

fn apply_cell_msg(engine: &mut grid::SelectionEngine, msg: CellMsg) -> PointerEffect {
    use CellMsg::*;
    use PointerEffect::*;

    let result = match msg {
        Press(CellPointerState { pos, buttons }) if buttons.contains(MouseButtons::LEFT) => {
            engine
                .begin_drag(pos)
                .map(|start| match start {
                    grid::DragStart::Started => Redraw,
                    grid::DragStart::AlreadyDragging => Nothing,
                })
        }
        Press(_) => Ok(Nothing),
        Enter(CellPointerState { pos, buttons }) if buttons.contains(MouseButtons::LEFT) => engine
            .update_drag(pos)
            .map(|moved| if moved { Redraw } else { Nothing }),
        // the button went up somewhere we could not see
        Enter(_) if engine.cancel_drag() => Ok(Redraw),
        Enter(_) => Ok(Nothing),
        // some other button came up while the primary one is still held
        Release(CellPointerState { buttons, .. }) if buttons.contains(MouseButtons::LEFT) => {
            Ok(Nothing)
        }
        Release(CellPointerState { pos, .. }) => engine.update_drag(pos).map(|_| {
            match engine.end_drag() {
                grid::DragOutcome::Conflict(ticket) => ScheduleExpiry(ticket),
                outcome if outcome.has_update() => Redraw,
                _ => Nothing,
            }
        }),
    };

    result.unwrap_or_else(|err| {
        log::warn!("pointer event {:?} rejected: {}", msg, err);
        Nothing
    })
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellEvent(CellMsg),
    LeaveGrid,
    ExpireMessage(grid::MessageTicket),
    UpdateAnswer(String),
    CheckAnswer,
    Reset,
    ShowHelp,
    AcknowledgeHelp,
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    row: grid::Coord,
    col: grid::Coord,
    cell: grid::Cell,
    #[prop_or_default]
    highlighted: bool,
    callback: Callback<CellMsg>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    use grid::Cell::*;

    let CellProps {
        row,
        col,
        cell,
        highlighted,
        callback,
    } = props.clone();

    let mut class = classes!(
        "cell",
        match cell {
            Unselected => classes!(),
            Selected => classes!("selected"),
            Excluded => classes!("excluded"),
        }
    );
    if highlighted {
        class.push("highlight");
    }

    let pointer_state = move |e: &MouseEvent| CellPointerState {
        pos: (row, col),
        buttons: MouseButtons::from_bits_truncate(e.buttons()),
    };

    let onmousedown = {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            // keep the browser from starting a text selection
            e.prevent_default();
            let state = pointer_state(&e);
            callback.emit(CellMsg::Press(state));
            log::trace!("({}, {}) mouse down ({:?})", row, col, state.buttons);
        })
    };

    let onmouseenter = {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            let state = pointer_state(&e);
            callback.emit(CellMsg::Enter(state));
            log::trace!("({}, {}) mouse enter ({:?})", row, col, state.buttons);
        })
    };

    let onmouseup = {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            let state = pointer_state(&e);
            callback.emit(CellMsg::Release(state));
            log::trace!("({}, {}) mouse up ({:?})", row, col, state.buttons);
        })
    };

    let glyph = match cell {
        Unselected => "",
        Selected => "🍎",
        Excluded => "✗",
    };

    html! {
        <td {class} {onmousedown} {onmouseenter} {onmouseup}>{glyph}</td>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct LessonProps {
    /// Do not open the help dialog on this load
    #[arg(long)]
    pub skip_help: bool,
}

#[derive(Debug)]
pub(crate) struct LessonView {
    engine: grid::SelectionEngine,
    store: CookiePreferenceStore,
    prefs: grid::Preferences,
    help_open: bool,
    /// Clear scheduled for the message on display; dropping it cancels the timer.
    pending_expiry: Option<(grid::MessageTicket, Timeout)>,
}

impl LessonView {
    fn with_store(store: CookiePreferenceStore, skip_help: bool) -> Self {
        let prefs = grid::Preferences::load_or_default(&store);
        log::debug!("preferences: {:?}", prefs);

        Self {
            engine: grid::SelectionEngine::new(),
            store,
            prefs,
            help_open: prefs.show_help_on_load && !skip_help,
            pending_expiry: None,
        }
    }

    fn schedule_message_expiry(
        &mut self,
        ticket: grid::MessageTicket,
        on_expire: &Callback<grid::MessageTicket>,
    ) {
        let on_expire = on_expire.clone();
        let millis = grid::CONFLICT_MESSAGE_TIMEOUT.as_millis() as u32;
        let timeout = Timeout::new(millis, move || on_expire.emit(ticket));
        // the replaced handle is dropped, which cancels its timer
        self.pending_expiry = Some((ticket, timeout));
    }

    fn pending_ticket(&self) -> Option<grid::MessageTicket> {
        self.pending_expiry.as_ref().map(|(ticket, _)| *ticket)
    }

    fn acknowledge_help(&mut self) {
        self.help_open = false;
        if !self.prefs.show_help_on_load {
            return;
        }

        self.prefs.show_help_on_load = false;
        if let Err(err) = self.store.save(&self.prefs) {
            log::error!("failed to save preferences: {}", err);
        }
    }

    fn report_answer(&self) {
        let verdict = if self.engine.check_current_answer() {
            "Correct, well done!"
        } else {
            "Incorrect answer, please try again."
        };
        log::debug!("answer {:?}: {}", self.engine.answer(), verdict);
        gloo::dialogs::alert(verdict);
    }

    /// Applies `msg`; `on_expire` receives the ticket once the message timeout elapses.
    fn handle(&mut self, msg: Msg, on_expire: &Callback<grid::MessageTicket>) -> bool {
        use Msg::*;

        match msg {
            CellEvent(cell_msg) => match apply_cell_msg(&mut self.engine, cell_msg) {
                PointerEffect::Nothing => false,
                PointerEffect::Redraw => true,
                PointerEffect::ScheduleExpiry(ticket) => {
                    self.schedule_message_expiry(ticket, on_expire);
                    true
                }
            },
            LeaveGrid => {
                log::trace!("grid leave");
                self.engine.cancel_drag()
            }
            ExpireMessage(ticket) => {
                if self.pending_ticket() == Some(ticket) {
                    self.pending_expiry = None;
                }
                self.engine.expire_message(ticket)
            }
            UpdateAnswer(answer) => {
                self.engine.set_answer(answer);
                false
            }
            CheckAnswer => {
                self.report_answer();
                false
            }
            Reset => {
                log::debug!("reset");
                self.pending_expiry = None;
                self.engine.reset();
                true
            }
            ShowHelp => {
                self.help_open = true;
                true
            }
            AcknowledgeHelp => {
                self.acknowledge_help();
                true
            }
        }
    }
}

impl Component for LessonView {
    type Message = Msg;
    type Properties = LessonProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self::with_store(CookiePreferenceStore::new(), ctx.props().skip_help)
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let on_expire = ctx.link().callback(Msg::ExpireMessage);
        self.handle(msg, &on_expire)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let (rows, cols) = self.engine.grid().size();
        let equation = self.engine.equation();
        let cell_callback = ctx.link().callback(CellEvent);

        let cb_reset = ctx.link().callback(|_| Reset);
        let cb_help = ctx.link().callback(|_| ShowHelp);
        let cb_check = ctx.link().callback(|_| CheckAnswer);
        let cb_acknowledge = ctx.link().callback(|_| AcknowledgeHelp);
        let cb_leave = ctx.link().callback(|_: MouseEvent| LeaveGrid);
        let cb_answer = ctx.link().callback(|e: InputEvent| {
            UpdateAnswer(e.target_unchecked_into::<HtmlInputElement>().value())
        });

        html! {
            <div class="countgrid">
                <h1>{"Counting grid"}</h1>
                <div class="equation">
                    {equation.to_string()}
                    if !equation.is_empty() {
                        <>
                            <input
                                type="text"
                                inputmode="numeric"
                                class="answer"
                                value={self.engine.answer().to_string()}
                                oninput={cb_answer}
                            />
                            <button onclick={cb_check}>{"Check"}</button>
                        </>
                    }
                </div>
                if let Some(message) = self.engine.message() {
                    <div class="message">{message}</div>
                }
                <nav>
                    <button onclick={cb_reset}>{"Reset"}</button>
                    <button onclick={cb_help}>{"Help"}</button>
                </nav>
                <table class={self.engine.is_dragging().then_some("dragging")} onmouseleave={cb_leave}>
                    {
                        for (0..rows).map(|row| html! {
                            <tr>
                                {
                                    for (0..cols).map(|col| {
                                        let pos = (row, col);
                                        let cell = self.engine.cell_at(pos);
                                        let highlighted = self.engine.is_highlighted(pos);
                                        let callback = cell_callback.clone();
                                        html! {
                                            <CellView {row} {col} {cell} {highlighted} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                if self.help_open {
                    <HelpDialog on_acknowledge={cb_acknowledge}/>
                }
            </div>
        }
    }
}
