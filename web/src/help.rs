use crate::utils::Modal;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct HelpProps {
    pub on_acknowledge: Callback<MouseEvent>,
}

#[function_component]
pub(crate) fn HelpDialog(props: &HelpProps) -> Html {
    html! {
        <Modal>
            <dialog id="help" open={true}>
                <article>
                    <h2>{"How to use the counting grid"}</h2>
                    <h3>{"Addition"}</h3>
                    <p>{"Click or drag across several cells in one row or column to add them up."}</p>
                    <h3>{"Multiplication"}</h3>
                    <p>{"Drag over a block that spans several rows and columns: that is rows times columns."}</p>
                    <h3>{"Subtraction"}</h3>
                    <p>{"Drag over cells that are already selected to cross them out, which takes them away."}</p>
                    <h3>{"Tip"}</h3>
                    <p>{"Read the equation above the grid, type your answer and press \"Check\". Press \"Reset\" to start over."}</p>
                    <footer>
                        <button onclick={props.on_acknowledge.clone()}>{"Got it"}</button>
                    </footer>
                </article>
            </dialog>
        </Modal>
    }
}
