//! 食堂菜单页
//!
//! 静态示例数据，按星期在客户端过滤。

use leptos::prelude::*;

#[derive(Clone, Copy, PartialEq)]
struct MenuItem {
    day: &'static str,
    meal: &'static str,
    hall: &'static str,
    dish: &'static str,
    price: &'static str,
}

const DAYS: [&str; 6] = ["All", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

const MENU: &[MenuItem] = &[
    MenuItem { day: "Monday", meal: "Lunch", hall: "North Hall", dish: "Teriyaki chicken bowl", price: "$6.50" },
    MenuItem { day: "Monday", meal: "Lunch", hall: "South Hall", dish: "Margherita pizza", price: "$5.00" },
    MenuItem { day: "Monday", meal: "Dinner", hall: "North Hall", dish: "Beef noodle soup", price: "$7.00" },
    MenuItem { day: "Tuesday", meal: "Lunch", hall: "North Hall", dish: "Falafel wrap", price: "$5.50" },
    MenuItem { day: "Tuesday", meal: "Dinner", hall: "South Hall", dish: "Grilled salmon with rice", price: "$8.50" },
    MenuItem { day: "Wednesday", meal: "Lunch", hall: "South Hall", dish: "Pasta primavera", price: "$6.00" },
    MenuItem { day: "Wednesday", meal: "Dinner", hall: "North Hall", dish: "Korean fried chicken", price: "$7.50" },
    MenuItem { day: "Thursday", meal: "Lunch", hall: "North Hall", dish: "Burrito bowl", price: "$6.50" },
    MenuItem { day: "Thursday", meal: "Dinner", hall: "South Hall", dish: "Mushroom risotto", price: "$7.00" },
    MenuItem { day: "Friday", meal: "Lunch", hall: "South Hall", dish: "Fish and chips", price: "$7.50" },
    MenuItem { day: "Friday", meal: "Dinner", hall: "North Hall", dish: "Vegetable curry", price: "$6.00" },
];

#[component]
pub fn CafeteriaPage() -> impl IntoView {
    let (day, set_day) = signal("All".to_string());

    let filtered = move || {
        let selected = day.get();
        MENU.iter()
            .copied()
            .filter(|item| selected == "All" || item.day == selected)
            .collect::<Vec<_>>()
    };

    view! {
        <div class="max-w-5xl mx-auto space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-2xl font-bold">"Cafeteria"</h1>
                    <p class="text-base-content/70 text-sm">"Menus for the week, by dining hall."</p>
                </div>
                <select
                    class="select select-bordered"
                    on:change=move |ev| set_day.set(event_target_value(&ev))
                >
                    {DAYS
                        .iter()
                        .map(|d| {
                            let d = *d;
                            view! {
                                <option value=d selected=move || day.get() == d>{d}</option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0 overflow-x-auto">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Day"</th>
                                <th>"Meal"</th>
                                <th>"Dining hall"</th>
                                <th>"Dish"</th>
                                <th>"Price"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=filtered
                                key=|item| item.dish
                                children=move |item| {
                                    view! {
                                        <tr>
                                            <td>{item.day}</td>
                                            <td>
                                                <span class="badge badge-outline">{item.meal}</span>
                                            </td>
                                            <td>{item.hall}</td>
                                            <td class="font-medium">{item.dish}</td>
                                            <td class="font-mono text-sm">{item.price}</td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}
